use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placeholder used when a row has no usable category
pub const UNKNOWN_CATEGORY: &str = "Unknown";

static EMPTY_CELL: Cell = Cell::Empty;

//==============================================================================
// Cells and tables
//==============================================================================

/// A raw spreadsheet cell as read from a source file or the remote sheet.
///
/// Untagged so that JSON `null`, booleans, numbers and strings map directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(f64::from(n))
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Format a number for display, dropping a trailing `.0` on whole values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Rectangular-ish table: row 0 is the header, the rest are data rows.
///
/// Rows may be shorter than the header; out-of-range cells read as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a table from anything convertible into cells
    pub fn from_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// Total row count, header included
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn header_len(&self) -> usize {
        self.header().len()
    }

    pub fn header_labels(&self) -> Vec<String> {
        self.header().iter().map(ToString::to_string).collect()
    }

    /// Header text of a column, empty when the header is shorter
    pub fn header_label(&self, col: usize) -> String {
        self.header().get(col).map(ToString::to_string).unwrap_or_default()
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Cell at a 0-based position; padded with `Cell::Empty`
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Set a cell at a 0-based position, growing the table as needed
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, Cell::Empty);
        }
        cells[col] = value;
    }
}

/// Cell of a row, padded with `Cell::Empty`
pub fn row_cell(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

/// Category key of a data row: column 0, trimmed, `"Unknown"` when blank
pub fn category_key(row: &[Cell]) -> String {
    category_at(row, 0)
}

/// Category key read from an arbitrary column
pub fn category_at(row: &[Cell], col: usize) -> String {
    let key = row_cell(row, col).to_string();
    let key = key.trim();
    if key.is_empty() {
        UNKNOWN_CATEGORY.to_string()
    } else {
        key.to_string()
    }
}

//==============================================================================
// Aggregation results
//==============================================================================

/// Per-category revenue total from the initial aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(rename = "revenue")]
    pub total: f64,
}

impl CategoryTotal {
    pub fn new(category: impl Into<String>, total: f64) -> Self {
        Self {
            category: category.into(),
            total,
        }
    }
}

/// Period-over-period view of one category for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub category: String,
    pub latest: f64,
    pub previous: f64,
    /// Percentage change; `None` when there is no non-zero baseline
    pub growth: Option<f64>,
    #[serde(rename = "date")]
    pub period_label: String,
}

/// The `processed_data.json` document written by `tasklytics aggregate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub timestamp: String,
    pub summary: Vec<CategoryTotal>,
}

impl Summary {
    pub fn new(summary: Vec<CategoryTotal>) -> Self {
        Self {
            timestamp: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            summary,
        }
    }
}

//==============================================================================
// Sync record
//==============================================================================

/// New period's values keyed by category, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncRecord {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl SyncRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for a category
    pub fn insert(&mut self, category: impl Into<String>, value: f64) {
        let category = category.into();
        match self.index.get(&category) {
            Some(&i) => self.entries[i].1 = value,
            None => self.push(category, value),
        }
    }

    /// Add to the value for a category (duplicates are summed)
    pub fn add(&mut self, category: impl Into<String>, value: f64) {
        let category = category.into();
        match self.index.get(&category) {
            Some(&i) => self.entries[i].1 += value,
            None => self.push(category, value),
        }
    }

    /// Keep the first value seen for a category
    pub fn insert_first(&mut self, category: impl Into<String>, value: f64) {
        let category = category.into();
        if !self.index.contains_key(&category) {
            self.push(category, value);
        }
    }

    fn push(&mut self, category: String, value: f64) {
        self.index.insert(category.clone(), self.entries.len());
        self.entries.push((category, value));
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.index.get(category).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.index.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn from_totals(totals: &[CategoryTotal]) -> Self {
        totals
            .iter()
            .map(|t| (t.category.clone(), t.total))
            .collect()
    }
}

impl FromIterator<(String, f64)> for SyncRecord {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut record = SyncRecord::new();
        for (category, value) in iter {
            record.insert(category, value);
        }
        record
    }
}
