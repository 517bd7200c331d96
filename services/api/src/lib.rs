mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use pollen_scoring::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
