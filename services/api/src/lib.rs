mod cli;
mod demo;
mod infra;
mod referrals;
mod routes;
mod server;

use tb_screening::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
