//! Spreadsheet file reader - .xlsx/.xls/.ods → `Table`

use crate::error::{TasklyticsError, TasklyticsResult};
use crate::types::{Cell, Table};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

/// Reads the sales source table from a workbook
pub struct SourceReader {
    path: PathBuf,
    sheet: Option<String>,
}

impl SourceReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: None,
        }
    }

    /// Read a named worksheet instead of the first one
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn read(&self) -> TasklyticsResult<Table> {
        if !self.path.exists() {
            return Err(TasklyticsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source file not found: {}", self.path.display()),
            )));
        }
        read_worksheet(&self.path, self.sheet.as_deref())?.ok_or_else(|| {
            TasklyticsError::Excel(format!(
                "Worksheet '{}' not found in {}",
                self.sheet.as_deref().unwrap_or("<first>"),
                self.path.display()
            ))
        })
    }
}

/// Read one worksheet (the first when `sheet` is `None`).
///
/// Returns `Ok(None)` when the workbook has no such worksheet.
pub fn read_worksheet(path: &Path, sheet: Option<&str>) -> TasklyticsResult<Option<Table>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        TasklyticsError::Excel(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(wanted) => sheet_names.into_iter().find(|n| n == wanted),
        None => sheet_names.into_iter().next(),
    };
    let Some(name) = name else {
        return Ok(None);
    };

    let range = workbook.worksheet_range(&name)?;
    Ok(Some(table_from_range(&range)))
}

/// Convert a calamine range, keeping cells at their absolute positions
pub fn table_from_range(range: &Range<Data>) -> Table {
    let mut table = Table::default();
    let Some((start_row, start_col)) = range.start() else {
        return table;
    };

    for (r, row) in range.rows().enumerate() {
        for (c, data) in row.iter().enumerate() {
            let cell = cell_from_data(data);
            if cell != Cell::Empty {
                table.set(start_row as usize + r, start_col as usize + c, cell);
            }
        }
    }

    table
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}
