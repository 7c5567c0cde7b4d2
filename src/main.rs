//! Kursziel extractor
//!
//! Reads a URL list from an Excel workbook, fetches each page, extracts the
//! analyst price-target table, normalizes the target-price column, and
//! writes the combined result back to a workbook.

mod batch;
mod cli;
mod config;
mod excel;
mod scrape;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kursziel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            sheet,
            url_column,
            output,
        } => cli::run_batch(input, sheet, url_column, output).await,
        Commands::Check { url, format } => cli::run_check(url, format).await,
    }
}
