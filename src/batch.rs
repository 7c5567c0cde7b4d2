//! Batch runner: drives the fetch → select → normalize → merge pipeline
//! once per input row, strictly in order, and concatenates the results.

use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::scrape::{normalize::normalize, select_table, FetchError, PageFetcher, RateLimiter};
use crate::types::{BatchSummary, Cell, InputRow, ResultTable, RowBlock};

/// Sequential batch processor. Owns the HTTP client and the pacing policy
/// for the whole run.
pub struct BatchRunner {
    fetcher: PageFetcher,
    limiter: RateLimiter,
    keyword: String,
}

impl BatchRunner {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: PageFetcher::new(&config.fetch)?,
            limiter: RateLimiter::fixed(Duration::from_secs_f64(config.rate.delay_secs.max(0.0))),
            keyword: config.input.keyword.clone(),
        })
    }

    /// Process every input row in order. Per-row failures are logged and
    /// skipped; the batch itself never aborts.
    pub async fn run(&self, rows: &[InputRow]) -> (ResultTable, BatchSummary) {
        let mut result = ResultTable::default();
        let mut summary = BatchSummary {
            urls: rows.len(),
            ..Default::default()
        };

        for (i, row) in rows.iter().enumerate() {
            info!("processing URL {}/{}: {}", i + 1, rows.len(), row.url);

            let html = match self.fetcher.fetch(&row.url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("fetch failed, skipping row: {e}");
                    summary.skipped += 1;
                    continue;
                }
            };
            summary.fetched += 1;

            match extract_rows(row, &html, &self.keyword) {
                Some(block) => {
                    summary.extracted_rows += block.rows.len();
                    result.push_block(block);
                    // Pause only after a successful extraction.
                    self.limiter.acquire().await;
                }
                None => {
                    warn!("no data extracted from {}", row.url);
                    summary.skipped += 1;
                }
            }
        }

        info!(
            urls = summary.urls,
            fetched = summary.fetched,
            skipped = summary.skipped,
            rows = summary.extracted_rows,
            "batch finished"
        );
        (result, summary)
    }
}

/// Extract the price-target rows from one fetched page.
///
/// Selects the table, normalizes the matched column cell by cell (all
/// columns stay raw text when none matched), then tags every row with
/// `Source_URL` and the input row's pass-through columns. A pass-through
/// column with the same name as an extracted one overwrites it.
///
/// Returns `None` when the page has no usable table or the table has no
/// data rows.
pub fn extract_rows(input: &InputRow, html: &str, keyword: &str) -> Option<RowBlock> {
    let (table, matched) = select_table(html, keyword)?;
    if table.rows.is_empty() {
        return None;
    }

    let matched_idx = matched.as_deref().and_then(|name| table.column_index(name));

    let mut headers = table.headers.clone();
    let mut rows: Vec<Vec<Cell>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, raw)| {
                    if Some(i) == matched_idx {
                        match normalize(raw) {
                            Some(v) => Cell::Number(v),
                            None => Cell::Empty,
                        }
                    } else {
                        Cell::Text(raw.clone())
                    }
                })
                .collect()
        })
        .collect();

    set_column(
        &mut headers,
        &mut rows,
        "Source_URL",
        &Cell::Text(input.url.clone()),
    );
    for (name, value) in &input.extra {
        set_column(&mut headers, &mut rows, name, &Cell::Text(value.clone()));
    }

    Some(RowBlock { headers, rows })
}

/// Set `name` to `value` in every row, overwriting an existing column of
/// that name or appending a new one.
fn set_column(headers: &mut Vec<String>, rows: &mut [Vec<Cell>], name: &str, value: &Cell) {
    match headers.iter().position(|h| h == name) {
        Some(idx) => {
            for row in rows.iter_mut() {
                row[idx] = value.clone();
            }
        }
        None => {
            headers.push(name.to_string());
            for row in rows.iter_mut() {
                row.push(value.clone());
            }
        }
    }
}
