use clap::{Args, Parser, Subcommand};

use civiclens::error::AppError;

use crate::demo::{run_demo, run_export, DemoArgs, ExportArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "CivicLens",
    about = "Serve and demonstrate the civic representative resolution and rating engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run an end-to-end CLI demo covering resolution, feedback, and moderation
    Demo(DemoArgs),
    /// Write the moderation CSV export for the demo dataset
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Export(args) => run_export(args),
    }
}
