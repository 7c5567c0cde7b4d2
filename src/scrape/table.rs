//! HTML table extraction and selection.
//!
//! Parses every `<table>` on a fetched page into a [`ParsedTable`] grid and
//! picks the one that carries the price-target column: the first table whose
//! header mentions the configured keyword, with the first table on the page
//! as a fallback.

use scraper::{Html, Selector};
use tracing::{info, warn};

/// In-memory grid of one HTML table: ordered header names plus data rows.
///
/// Header casing is preserved as it appears on the page; rows are padded or
/// truncated to the header width so the grid is always rectangular.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Index of the column whose name equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column whose name contains `keyword`,
    /// case-insensitively.
    pub fn find_column(&self, keyword: &str) -> Option<usize> {
        let keyword = keyword.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase().contains(&keyword))
    }
}

/// Parse all tables on a page.
///
/// Header cells come from the `<thead>` section when one exists (all of its
/// `th`/`td` cells, flattened), otherwise from the first row. Tables that
/// yield neither header cells nor data rows are dropped.
pub fn parse_tables(html: &str) -> Vec<ParsedTable> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse("table").unwrap();
    let thead_cell_sel = Selector::parse("thead th, thead td").unwrap();
    // html5ever wraps stray <tr> elements in a <tbody>, so this also covers
    // markup written without an explicit body section.
    let body_row_sel = Selector::parse("tbody tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    let mut tables = Vec::new();

    for table in document.select(&table_sel) {
        let head_cells: Vec<String> = table
            .select(&thead_cell_sel)
            .map(|c| c.text().collect::<String>().trim().to_string())
            .collect();

        let body_rows: Vec<Vec<String>> = table
            .select(&body_row_sel)
            .map(|row| {
                row.select(&cell_sel)
                    .map(|c| c.text().collect::<String>().trim().to_string())
                    .collect()
            })
            .collect();

        let (headers, mut rows) = if head_cells.is_empty() {
            // First body row doubles as the header.
            match body_rows.split_first() {
                Some((first, rest)) => (first.clone(), rest.to_vec()),
                None => continue,
            }
        } else {
            (head_cells, body_rows)
        };

        if headers.is_empty() && rows.is_empty() {
            continue;
        }

        for row in &mut rows {
            row.resize(headers.len(), String::new());
        }

        tables.push(ParsedTable { headers, rows });
    }

    tables
}

/// Locate the price-target table on a page.
///
/// Returns the first table whose header contains `keyword` together with the
/// matched column name (original casing), or the first table on the page
/// with no matched column, or `None` when the page has no usable tables.
pub fn select_table(html: &str, keyword: &str) -> Option<(ParsedTable, Option<String>)> {
    let tables = parse_tables(html);

    for table in &tables {
        if let Some(idx) = table.find_column(keyword) {
            let column = table.headers[idx].clone();
            info!(
                rows = table.rows.len(),
                column = %column,
                "price target table matched"
            );
            return Some((table.clone(), Some(column)));
        }
    }

    match tables.into_iter().next() {
        Some(first) => {
            info!(
                rows = first.rows.len(),
                "no '{}' column found; falling back to first table", keyword
            );
            Some((first, None))
        }
        None => {
            warn!("no tables found on page");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KURSZIELE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
<table>
    <tr><td>Nav</td><td>Links</td></tr>
    <tr><td>Home</td><td>News</td></tr>
</table>
<table>
    <thead>
        <tr><th>Institut</th><th>Kursziel</th><th>Datum</th></tr>
    </thead>
    <tbody>
        <tr><td>Bank A</td><td>123,50 €</td><td>2024-01-01</td></tr>
        <tr><td>Bank B</td><td>150,00 €</td><td>2024-02-15</td></tr>
    </tbody>
</table>
</body>
</html>"#;

    #[test]
    fn test_select_keyword_table() {
        let (table, column) = select_table(KURSZIELE_PAGE, "kursziel").unwrap();

        assert_eq!(column.as_deref(), Some("Kursziel"));
        assert_eq!(table.headers, vec!["Institut", "Kursziel", "Datum"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "123,50 €");
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let html = r#"<table>
            <tr><th>Analyst</th><th>KURSZIEL in EUR</th></tr>
            <tr><td>X</td><td>12,00</td></tr>
        </table>"#;
        let (table, column) = select_table(html, "kursziel").unwrap();

        // Matching lower-cases a copy; the original casing comes back.
        assert_eq!(column.as_deref(), Some("KURSZIEL in EUR"));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_fallback_to_first_table() {
        let html = r#"
            <table><tr><th>Foo</th></tr><tr><td>1</td></tr></table>
            <table><tr><th>Bar</th></tr><tr><td>2</td></tr></table>
        "#;
        let (table, column) = select_table(html, "kursziel").unwrap();

        assert_eq!(column, None);
        assert_eq!(table.headers, vec!["Foo"]);
    }

    #[test]
    fn test_no_tables_on_page() {
        assert_eq!(select_table("<html><body><p>hi</p></body></html>", "kursziel"), None);
    }

    #[test]
    fn test_first_row_header_without_thead() {
        let html = r#"<table>
            <tr><th>Institut</th><th>Kursziel</th></tr>
            <tr><td>Bank A</td><td>99,99</td></tr>
        </table>"#;
        let tables = parse_tables(html);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Institut", "Kursziel"]);
        assert_eq!(tables[0].rows, vec![vec!["Bank A", "99,99"]]);
    }

    #[test]
    fn test_empty_tables_are_skipped() {
        let html = r#"
            <table></table>
            <table><tr><th>Real</th></tr><tr><td>1</td></tr></table>
        "#;
        let tables = parse_tables(html);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Real"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let html = r#"<table>
            <thead><tr><th>A</th><th>B</th><th>C</th></tr></thead>
            <tbody><tr><td>1</td></tr></tbody>
        </table>"#;
        let tables = parse_tables(html);

        assert_eq!(tables[0].rows, vec![vec!["1", "", ""]]);
    }

    #[test]
    fn test_header_only_table_is_kept_with_no_rows() {
        let html = r#"<table><thead><tr><th>Kursziel</th></tr></thead></table>"#;
        let tables = parse_tables(html);

        assert_eq!(tables.len(), 1);
        assert!(tables[0].rows.is_empty());
    }

    #[test]
    fn test_column_lookup() {
        let table = ParsedTable {
            headers: vec!["Institut".into(), "Kursziel in EUR".into()],
            rows: Vec::new(),
        };

        assert_eq!(table.column_index("Kursziel in EUR"), Some(1));
        assert_eq!(table.column_index("kursziel"), None);
        assert_eq!(table.find_column("KURSZIEL"), Some(1));
        assert_eq!(table.find_column("rating"), None);
    }
}
