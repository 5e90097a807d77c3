use crate::issue::{run_batch, run_issue, run_serial, BatchArgs, IssueArgs, SerialArgs};
use clap::{Parser, Subcommand};
use conference_ticket::config::AppConfig;
use conference_ticket::error::AppError;
use conference_ticket::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "conference-ticket",
    about = "Validate attendee details and issue conference tickets from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one attendee's details and print the resulting ticket or form errors
    Issue(IssueArgs),
    /// Print the serial code a name and email would receive
    Serial(SerialArgs),
    /// Issue tickets for every row of an attendee CSV
    Batch(BatchArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, avatar_max_bytes = config.intake.avatar_max_bytes, "configuration loaded");

    match cli.command {
        Command::Issue(args) => run_issue(args, &config).await,
        Command::Serial(args) => run_serial(args),
        Command::Batch(args) => run_batch(args, &config).await,
    }
}
