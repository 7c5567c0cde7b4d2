//! Numeric normalization for price-target cells.
//!
//! Pages in scope format numbers the European way: `.` separates thousands
//! and `,` marks the decimal place, usually with a trailing currency marker
//! (`123,50 €`). Normalization strips the markers and converts the numeral
//! to a plain float.

use regex::Regex;

/// Normalize one raw table cell to a float.
///
/// Returns `None` for empty or non-numeric input; never fails.
///
/// When the cleaned value contains a decimal comma, every `.` is dropped as
/// a thousands separator first (`1.234,56` -> 1234.56). Without a comma the
/// value is parsed as-is, so `1234.56` stays 1234.56. This also means an
/// ambiguous `1,234` parses as 1.234 rather than one thousand; the input
/// format gives no way to tell the two apart.
pub fn normalize(raw: &str) -> Option<f64> {
    let marker_re = Regex::new(r"\s|€|EUR|USD").unwrap();
    let stripped = marker_re.replace_all(raw, "");
    if stripped.is_empty() {
        return None;
    }

    let candidate = if stripped.contains(',') {
        stripped.replace('.', "").replace(',', ".")
    } else {
        stripped.into_owned()
    };

    candidate.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_european_decimal_formats() {
        assert_eq!(normalize("1.234,56"), Some(1234.56));
        assert_eq!(normalize("1234,56"), Some(1234.56));
        assert_eq!(normalize("1.234,56 €"), Some(1234.56));
        assert_eq!(normalize("1234.56 USD"), Some(1234.56));
    }

    #[test]
    fn test_currency_markers_stripped() {
        assert_eq!(normalize("123,50 €"), Some(123.5));
        assert_eq!(normalize("EUR 99,00"), Some(99.0));
        assert_eq!(normalize("42 USD"), Some(42.0));
    }

    #[test]
    fn test_non_breaking_space() {
        // finanzen.net separates the amount from the euro sign with U+00A0.
        assert_eq!(normalize("150,00\u{a0}€"), Some(150.0));
    }

    #[test]
    fn test_ambiguous_comma_is_decimal() {
        // Documented quirk: the comma is always a decimal separator.
        assert_eq!(normalize("1,234"), Some(1.234));
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(normalize("180"), Some(180.0));
    }

    #[test]
    fn test_non_numeric_is_absent() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("n/a"), None);
        assert_eq!(normalize("Halten"), None);
        assert_eq!(normalize("€"), None);
    }

    #[test]
    fn test_multiple_thousands_groups() {
        assert_eq!(normalize("1.234.567,89"), Some(1234567.89));
    }
}
