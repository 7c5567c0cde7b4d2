//! Shared value types for the extraction pipeline.

use serde::Serialize;
use std::fmt;

/// One record from the input workbook: the URL to fetch plus the row's
/// remaining columns, in sheet order, carried through to the output untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub url: String,
    pub extra: Vec<(String, String)>,
}

/// A single output cell. The normalized price-target column holds `Number`
/// (or `Empty` when normalization fails); everything else stays `Text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Empty => Ok(()),
        }
    }
}

/// The rows extracted from one fetched page, already tagged with
/// `Source_URL` and the input row's pass-through columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowBlock {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Concatenation of all extracted row blocks, in the order they were
/// collected. Headers are the first-seen union across blocks; rows are
/// padded with `Empty` for columns their block did not produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one block, aligning its columns with the accumulated header
    /// set by name. New headers are added at the end; rows already present
    /// are widened with `Empty` cells.
    pub fn push_block(&mut self, block: RowBlock) {
        let targets: Vec<usize> = block
            .headers
            .iter()
            .map(|h| match self.headers.iter().position(|e| e == h) {
                Some(i) => i,
                None => {
                    self.headers.push(h.clone());
                    self.headers.len() - 1
                }
            })
            .collect();

        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }

        for row in block.rows {
            let mut out = vec![Cell::Empty; width];
            for (cell, &target) in row.into_iter().zip(&targets) {
                out[target] = cell;
            }
            self.rows.push(out);
        }
    }
}

/// Per-stage counts reported after a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Rows with a usable URL after cleanup
    pub urls: usize,
    /// Pages fetched successfully
    pub fetched: usize,
    /// Rows skipped after a fetch failure or an empty extraction
    pub skipped: usize,
    /// Output rows collected across all pages
    pub extracted_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(headers: &[&str], rows: Vec<Vec<Cell>>) -> RowBlock {
        RowBlock {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_push_block_same_headers() {
        let mut table = ResultTable::default();
        table.push_block(block(
            &["A", "B"],
            vec![vec![Cell::Text("1".into()), Cell::Number(2.0)]],
        ));
        table.push_block(block(
            &["A", "B"],
            vec![vec![Cell::Text("3".into()), Cell::Number(4.0)]],
        ));

        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], Cell::Number(4.0));
    }

    #[test]
    fn test_push_block_unions_headers_in_first_seen_order() {
        let mut table = ResultTable::default();
        table.push_block(block(
            &["A", "B"],
            vec![vec![Cell::Number(1.0), Cell::Number(2.0)]],
        ));
        table.push_block(block(
            &["B", "C"],
            vec![vec![Cell::Number(3.0), Cell::Number(4.0)]],
        ));

        assert_eq!(table.headers, vec!["A", "B", "C"]);
        // Earlier rows are widened with Empty for the new column.
        assert_eq!(
            table.rows[0],
            vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Empty]
        );
        // New rows map onto the union by header name.
        assert_eq!(
            table.rows[1],
            vec![Cell::Empty, Cell::Number(3.0), Cell::Number(4.0)]
        );
    }

    #[test]
    fn test_push_block_preserves_collection_order() {
        let mut table = ResultTable::default();
        for i in 0..3 {
            table.push_block(block(&["N"], vec![vec![Cell::Number(i as f64)]]));
        }
        let values: Vec<_> = table.rows.iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            values,
            vec![Cell::Number(0.0), Cell::Number(1.0), Cell::Number(2.0)]
        );
    }

    #[test]
    fn test_empty_result_table() {
        let table = ResultTable::default();
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Text("abc".into()).to_string(), "abc");
        assert_eq!(Cell::Number(123.5).to_string(), "123.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }
}
