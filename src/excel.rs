//! Workbook I/O: reads the URL list from the input sheet and writes the
//! concatenated result table back out as `.xlsx`.

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{Cell, InputRow, ResultTable};

/// Read the input sheet and return one [`InputRow`] per usable URL.
///
/// The first row is the header. Rows whose URL cell is empty after trimming
/// are dropped; every other column travels along as pass-through metadata in
/// sheet order.
pub fn read_input(path: &Path, sheet: &str, url_column: &str) -> Result<Vec<InputRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open input workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("worksheet '{}' not found in {}", sheet, path.display()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("worksheet '{}' is empty", sheet);
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_to_string(c).trim().to_string())
        .collect();

    let Some(url_idx) = headers.iter().position(|h| h == url_column) else {
        bail!("column '{}' not found in worksheet '{}'", url_column, sheet);
    };

    let mut total = 0usize;
    let mut input_rows = Vec::new();
    for row in rows {
        total += 1;
        let url = row
            .get(url_idx)
            .map(cell_to_string)
            .unwrap_or_default()
            .trim()
            .to_string();
        if url.is_empty() {
            continue;
        }

        let extra: Vec<(String, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != url_idx)
            .map(|(i, name)| {
                (
                    name.clone(),
                    row.get(i).map(cell_to_string).unwrap_or_default(),
                )
            })
            .collect();

        input_rows.push(InputRow { url, extra });
    }

    info!(rows = total, urls = input_rows.len(), "input sheet read");
    Ok(input_rows)
}

/// Write the result table to `path` as a single-sheet workbook.
pub fn write_result(path: &Path, table: &ResultTable) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string((r + 1) as u32, c as u16, s)?;
                }
                Cell::Number(v) => {
                    worksheet.write_number((r + 1) as u32, c as u16, *v)?;
                }
                Cell::Empty => {}
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write result workbook {}", path.display()))?;
    Ok(())
}

/// Default output path: the input file name with `_kursziele` appended
/// before the extension, always as `.xlsx`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("kursziele");
    input.with_file_name(format!("{stem}_kursziele.xlsx"))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Display renders 42.0 as "42", matching what the sheet shows.
        other => other.to_string(),
    }
}
