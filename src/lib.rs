mod cli;
mod infra;
mod issue;
mod render;

use conference_ticket::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
