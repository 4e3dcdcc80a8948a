use once_cell::sync::Lazy;
use regex::Regex;

/// Missing value tokens
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "NULL", "null", "NaN", "nan", ".", "-", "--", "missing",
    "MISSING", "None", "none", "#N/A", "#VALUE!", "#REF!", "#DIV/0!", "#NUM!", "#NAME?", "#NULL!",
];

// Counts exported from spreadsheets often carry thousands separators: 1,234 or 12,345.50
static GROUPED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

/// Interpretation of a single raw cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Missing,
    Text(String),
}

impl CellValue {
    /// Interpret a raw cell: missing tokens first, then numbers, then text
    pub fn parse(raw: &str) -> Self {
        if is_missing(raw) {
            CellValue::Missing
        } else if let Some(num) = parse_numeric(raw) {
            CellValue::Number(num)
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Check if a value represents a missing value
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Parse a finite numeric value, accepting thousands separators
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = if GROUPED_NUMBER.is_match(trimmed) {
        trimmed.replace(',', "").parse::<f64>().ok()
    } else {
        trimmed.parse::<f64>().ok()
    };

    // "inf" and "nan" parse as f64 but are not counts
    parsed.filter(|n| n.is_finite())
}
