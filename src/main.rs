mod auth;
mod cli;
mod config;
mod error;
mod output;
mod pipeline;
mod providers;

use clap::Parser;
use cli::Cli;
use error::PipegenError;
use log::info;

#[tokio::main]
async fn main() {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting pipegen - GitLab CI/CD Pipeline Generator");

    if let Err(err) = cli.execute().await {
        match err.downcast_ref::<PipegenError>() {
            Some(e) if !e.validation_errors().is_empty() => {
                output::print_errors("Invalid pipeline options", e.validation_errors());
            }
            _ => output::print_errors("pipegen failed", &[format!("{err:#}")]),
        }
        std::process::exit(1);
    }
}
