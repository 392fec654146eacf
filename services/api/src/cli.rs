use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cyberscore::error::AppError;

use crate::demo::{run_demo, run_score, DemoArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Cyberscore",
    about = "Run the security self-assessment scoring service from the command line",
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
    /// Score an answer file against the questionnaire without persisting
    Score(ScoreArgs),
    /// Run an end-to-end CLI demo covering submission and sector comparison
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

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file mapping `{category_id}_{question_id}` keys to chosen options
    pub(crate) answers: PathBuf,
    /// Questionnaire definition; the built-in catalog is used when omitted
    #[arg(long)]
    pub(crate) questionnaire: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
