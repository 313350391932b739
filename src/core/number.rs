//! Numeric cell parsing
//!
//! Spreadsheet cells arrive as numbers, text like `"₹1,200"` or nothing at all.
//! Parsing is total: anything that is not a finite number becomes `0.0`.

use crate::config::SyncConfig;
use crate::types::Cell;

/// Parses raw cells into `f64`, stripping separators and currency glyphs
#[derive(Debug, Clone, PartialEq)]
pub struct NumberParser {
    currency_symbols: Vec<String>,
}

impl Default for NumberParser {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

impl NumberParser {
    pub fn new(currency_symbols: Vec<String>) -> Self {
        Self { currency_symbols }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.currency_symbols.clone())
    }

    pub fn parse(&self, cell: &Cell) -> f64 {
        match cell {
            Cell::Empty => 0.0,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Number(n) => finite_or_zero(*n),
            Cell::Text(s) => self.parse_str(s),
        }
    }

    pub fn parse_str(&self, raw: &str) -> f64 {
        let mut cleaned = raw.trim().replace(',', "");
        for symbol in &self.currency_symbols {
            if !symbol.is_empty() {
                cleaned = cleaned.replace(symbol.as_str(), "");
            }
        }
        cleaned
            .trim()
            .parse::<f64>()
            .map(finite_or_zero)
            .unwrap_or(0.0)
    }
}

// `str::parse` accepts "nan" and "inf"; both count as garbage here.
fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parse a cell with the default currency symbols (`₹`, `Rs`, `€`)
pub fn parse_number(cell: &Cell) -> f64 {
    NumberParser::default().parse(cell)
}
