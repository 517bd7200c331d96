use crate::demo::{run_batch_score, run_demo, BatchScoreArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pollen_scoring::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pollen Scoring",
    about = "Serve and run the Pollen weighted candidate scoring engine",
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
    /// Aggregate every candidate in an assessment CSV export
    Score(BatchScoreArgs),
    /// Walk through a scoring and override example against in-memory storage
    Demo(DemoArgs),
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
        Command::Score(args) => run_batch_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
