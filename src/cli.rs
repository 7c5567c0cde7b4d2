//! CLI commands for the Kursziel extractor.
//!
//! `run` drives the full workbook batch; `check` fetches a single page and
//! prints what would be extracted, as a quick end-to-end diagnostic.

use anyhow::bail;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::batch::{extract_rows, BatchRunner};
use crate::config::AppConfig;
use crate::excel;
use crate::scrape::PageFetcher;
use crate::types::{Cell, InputRow, ResultTable};

/// Smoke-test page for `check`: the Rheinmetall price-target list.
const SMOKE_TEST_URL: &str = "https://www.finanzen.net/kursziele/703000";

#[derive(Parser)]
#[command(name = "kursziel")]
#[command(version, about = "Extracts analyst price targets from web pages listed in an Excel workbook", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every URL in the input sheet and write the combined table
    Run {
        /// Path to the input Excel file (prompted for when omitted)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Worksheet holding the URL list
        #[arg(long)]
        sheet: Option<String>,

        /// Column with one URL per row
        #[arg(long)]
        url_column: Option<String>,

        /// Output path (default: input name with `_kursziele` appended)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch a single page and print the extracted table
    Check {
        /// Page to fetch
        #[arg(long, default_value = SMOKE_TEST_URL)]
        url: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Run the workbook batch.
///
/// Mirrors the batch error policy: a missing or unreadable input workbook
/// aborts the batch with an empty result but still terminates normally;
/// only per-row failures are skipped.
pub async fn run_batch(
    input: Option<PathBuf>,
    sheet: Option<String>,
    url_column: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(s) = sheet {
        config.input.sheet = s;
    }
    if let Some(c) = url_column {
        config.input.url_column = c;
    }

    let input_path = match input {
        Some(path) => path,
        None => {
            let entered: String = dialoguer::Input::new()
                .with_prompt("Path to the input Excel file")
                .allow_empty(true)
                .interact_text()?;
            let entered = entered.trim().to_string();
            if entered.is_empty() {
                error!("no input file given");
                return Ok(());
            }
            PathBuf::from(entered)
        }
    };

    let rows = match excel::read_input(&input_path, &config.input.sheet, &config.input.url_column)
    {
        Ok(rows) => rows,
        Err(e) => {
            error!("failed to read input workbook: {e:#}");
            return Ok(());
        }
    };
    if rows.is_empty() {
        warn!("no usable URLs in the input sheet; nothing to do");
        return Ok(());
    }

    let runner = BatchRunner::new(&config)?;
    let (result, _summary) = runner.run(&rows).await;

    if result.is_empty() {
        warn!("nothing extracted; no output written");
        return Ok(());
    }

    let output_path = output.unwrap_or_else(|| excel::derive_output_path(&input_path));
    excel::write_result(&output_path, &result)?;
    info!("result saved to {}", output_path.display());

    print_table(&result, 10);
    Ok(())
}

/// Fetch one page and print the extracted table. Exits non-zero when the
/// page yields no data, so it doubles as a pipeline smoke test.
pub async fn run_check(url: String, format: String) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let fetcher = PageFetcher::new(&config.fetch)?;
    let html = fetcher.fetch(&url).await?;

    let row = InputRow {
        url: url.clone(),
        extra: Vec::new(),
    };
    let Some(block) = extract_rows(&row, &html, &config.input.keyword) else {
        bail!("no data extracted from {url}");
    };

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&block)?),
        _ => {
            let mut table = ResultTable::default();
            table.push_block(block);
            print_table(&table, usize::MAX);
        }
    }
    Ok(())
}

/// Print the first `limit` rows as a plain pipe-separated table.
fn print_table(table: &ResultTable, limit: usize) {
    println!("{}", table.headers.join(" | "));
    for row in table.rows.iter().take(limit) {
        let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
        println!("{}", cells.join(" | "));
    }
    if table.rows.len() > limit {
        println!("... {} more rows", table.rows.len() - limit);
    }
}
