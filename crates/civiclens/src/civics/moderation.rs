use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use super::comments::{CommentError, CommentThread};
use super::domain::{CitizenProfile, CommentId, Leader};
use super::ratings::{RatingError, RatingLedger};
use super::repository::{
    CommentRepository, LeaderDirectory, LeaderFilter, RatingRepository, RepositoryError,
};

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("administrator capability required")]
    Unauthorized,
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
    #[error(transparent)]
    Ratings(#[from] RatingError),
    #[error(transparent)]
    Comments(#[from] CommentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Flattened comment entry inside an admin stats card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeratedComment {
    pub id: CommentId,
    pub body: String,
    pub hidden: bool,
}

/// One admin stats card: a leader with aggregate score and full thread.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderStats {
    pub leader: Leader,
    /// `None` when the leader has no ratings yet; never 0.0 in that case.
    pub average: Option<f64>,
    pub rating_count: usize,
    pub comments: Vec<ModeratedComment>,
}

/// One CSV row for the export utility: a (leader, comment) pair alongside the
/// leader's aggregate numbers. Leaders without comments are skipped, matching
/// the dashboard export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub leader_id: String,
    pub name: String,
    pub position: &'static str,
    pub average: Option<f64>,
    pub rating_count: usize,
    pub comment: String,
    pub hidden: bool,
}

/// Admin read/write composition over the leader register, rating ledger, and
/// comment threads. Every call takes the caller's profile explicitly; no
/// admin flag means no data, regardless of transport.
pub struct ModerationDesk<L, R, C> {
    directory: Arc<L>,
    ratings: RatingLedger<R>,
    comments: CommentThread<C>,
}

impl<L, R, C> ModerationDesk<L, R, C>
where
    L: LeaderDirectory,
    R: RatingRepository,
    C: CommentRepository,
{
    pub fn new(directory: Arc<L>, ratings: Arc<R>, comments: Arc<C>) -> Self {
        Self {
            directory,
            ratings: RatingLedger::new(ratings),
            comments: CommentThread::new(comments),
        }
    }

    pub fn stats_for(
        &self,
        caller: &CitizenProfile,
        filter: &LeaderFilter,
    ) -> Result<Vec<LeaderStats>, ModerationError> {
        authorize(caller)?;

        let leaders = self.directory.filtered(filter)?;
        let mut stats = Vec::with_capacity(leaders.len());
        for leader in leaders {
            let summary = self.ratings.summary_for(&leader.id)?;
            let thread = self.comments.list_for_moderation(&leader.id)?;

            let mut comments = Vec::new();
            for node in thread {
                comments.push(ModeratedComment {
                    id: node.comment.id,
                    body: node.comment.body.clone(),
                    hidden: node.comment.hidden,
                });
                for reply in node.replies {
                    comments.push(ModeratedComment {
                        id: reply.id,
                        body: reply.body,
                        hidden: reply.hidden,
                    });
                }
            }

            stats.push(LeaderStats {
                leader,
                average: summary.average.mean(),
                rating_count: summary.count,
                comments,
            });
        }
        Ok(stats)
    }

    /// Hide or unhide a comment by id. Idempotent; hidden rows persist and
    /// stay visible in moderation listings.
    pub fn set_comment_hidden(
        &self,
        caller: &CitizenProfile,
        comment_id: &CommentId,
        hidden: bool,
    ) -> Result<(), ModerationError> {
        authorize(caller)?;
        Ok(self.comments.set_hidden(comment_id, hidden)?)
    }

    pub fn export_rows(
        &self,
        caller: &CitizenProfile,
        filter: &LeaderFilter,
    ) -> Result<Vec<ExportRow>, ModerationError> {
        let stats = self.stats_for(caller, filter)?;
        let mut rows = Vec::new();
        for entry in stats {
            for comment in &entry.comments {
                rows.push(ExportRow {
                    leader_id: entry.leader.id.0.clone(),
                    name: entry.leader.name.clone(),
                    position: entry.leader.position.label(),
                    average: entry.average,
                    rating_count: entry.rating_count,
                    comment: comment.body.clone(),
                    hidden: comment.hidden,
                });
            }
        }
        Ok(rows)
    }

    pub fn write_csv<W: Write>(
        &self,
        caller: &CitizenProfile,
        filter: &LeaderFilter,
        writer: W,
    ) -> Result<(), ModerationError> {
        let rows = self.export_rows(caller, filter)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

fn authorize(caller: &CitizenProfile) -> Result<(), ModerationError> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(ModerationError::Unauthorized)
    }
}
