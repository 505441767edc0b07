use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Args;

use civiclens::civics::{
    CountyId, EngineError, Feedback, FeedbackReceipt, LeaderFilter, Position,
};
use civiclens::error::AppError;

use crate::infra::{demo_admin, demo_citizen, parse_position, sample_hierarchy, seeded_service};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the moderation portion of the demo.
    #[arg(long)]
    pub(crate) skip_moderation: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Write the CSV to this path instead of stdout.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Restrict the export to one county id.
    #[arg(long)]
    pub(crate) county: Option<String>,
    /// Restrict the export to one position (president, governor, senator, women_rep, mp, mca).
    #[arg(long, value_parser = parse_position)]
    pub(crate) position: Option<Position>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (service, _) = seeded_service(Arc::new(sample_hierarchy()));
    let citizen = demo_citizen();

    println!("Civic engagement demo");
    println!(
        "Citizen {} located at county/constituency/ward: {:?} / {:?} / {:?}",
        citizen.id.0, citizen.county_id, citizen.constituency_id, citizen.ward_id
    );

    let leaders = service.resolve_leaders(&citizen).map_err(AppError::from)?;
    println!("\nYour representatives");
    for leader in &leaders {
        println!("- {}: {} ({})", leader.position.label(), leader.name, leader.id);
    }

    let governor = leaders
        .iter()
        .find(|l| l.position == Position::Governor)
        .ok_or_else(|| AppError::Engine(EngineError::InvalidLocation))?
        .id
        .clone();

    println!("\nFeedback for the governor");
    service
        .submit_feedback(&citizen, &governor, Feedback::Review { score: 4 })
        .map_err(AppError::from)?;
    println!("- Review submitted: score 4/5");

    let receipt = service
        .submit_feedback(
            &citizen,
            &governor,
            Feedback::Discussion {
                body: "Garbage collection in Parklands has improved this quarter".to_string(),
                parent_id: None,
            },
        )
        .map_err(AppError::from)?;
    let FeedbackReceipt::Discussion { comment_id } = receipt else {
        println!("- Discussion submission returned no comment id, stopping demo");
        return Ok(());
    };
    println!("- Discussion opened: comment {comment_id}");

    service
        .submit_feedback(
            &demo_admin(),
            &governor,
            Feedback::Discussion {
                body: "Flagging this thread for the county office".to_string(),
                parent_id: Some(comment_id),
            },
        )
        .map_err(AppError::from)?;
    println!("- Reply attached to comment {comment_id}");

    let page = service.leader_page(&governor).map_err(AppError::from)?;
    println!("\nPublic leader page");
    println!(
        "- {}: average {} over {} rating(s)",
        page.leader.name,
        format_average(page.average),
        page.rating_count
    );
    for node in &page.thread {
        println!("  - {}", node.comment.body);
        for reply in &node.replies {
            println!("    - {}", reply.body);
        }
    }

    if args.skip_moderation {
        return Ok(());
    }

    println!("\nModeration");
    let admin = demo_admin();
    service
        .moderation()
        .set_comment_hidden(&admin, &comment_id, true)
        .map_err(EngineError::from)
        .map_err(AppError::from)?;
    println!("- Hid comment {comment_id}");

    let page = service.leader_page(&governor).map_err(AppError::from)?;
    println!(
        "- Public thread now shows {} top-level comment(s)",
        page.thread.len()
    );

    let stats = service
        .moderation()
        .stats_for(&admin, &LeaderFilter::default())
        .map_err(EngineError::from)
        .map_err(AppError::from)?;
    println!("- Admin dashboard");
    for entry in &stats {
        println!(
            "  - {} ({}): average {} over {} rating(s), {} comment(s)",
            entry.leader.name,
            entry.leader.position.label(),
            format_average(entry.average),
            entry.rating_count,
            entry.comments.len()
        );
    }

    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let (service, _) = seeded_service(Arc::new(sample_hierarchy()));
    let citizen = demo_citizen();

    // Seed the demo dataset so the export carries rows.
    let leaders = service.resolve_leaders(&citizen).map_err(AppError::from)?;
    for leader in &leaders {
        service
            .submit_feedback(&citizen, &leader.id, Feedback::Review { score: 4 })
            .map_err(AppError::from)?;
        service
            .submit_feedback(
                &citizen,
                &leader.id,
                Feedback::Discussion {
                    body: format!("Quarterly check-in on {}", leader.name),
                    parent_id: None,
                },
            )
            .map_err(AppError::from)?;
    }

    let filter = LeaderFilter {
        county_id: args.county.map(CountyId),
        position: args.position,
    };

    let admin = demo_admin();
    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            service
                .moderation()
                .write_csv(&admin, &filter, file)
                .map_err(EngineError::from)
                .map_err(AppError::from)?;
            println!(
                "Wrote moderation export to {} (generated {})",
                path.display(),
                Local::now().date_naive()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            service
                .moderation()
                .write_csv(&admin, &filter, &mut handle)
                .map_err(EngineError::from)
                .map_err(AppError::from)?;
            handle.flush()?;
        }
    }

    Ok(())
}

fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{value:.2}"),
        None => "no ratings yet".to_string(),
    }
}
