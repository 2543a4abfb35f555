use crate::demo::{run_demo, run_sample_size, run_score, DemoArgs, SampleSizeArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use condition_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Condition Score",
    about = "Sample, capture, and score physical-condition inspections",
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
    /// Look up how many units to inspect for a property
    SampleSize(SampleSizeArgs),
    /// Score a stored inspection file and print its report
    Score(ScoreArgs),
    /// Run a scripted inspection end to end against the built-in catalog
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
        Command::SampleSize(args) => run_sample_size(args),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
