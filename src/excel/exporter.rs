//! Spreadsheet file writer - `Table` / summaries → .xlsx

use crate::error::{TasklyticsError, TasklyticsResult};
use crate::types::{CategoryTotal, Cell, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Write a table as the only worksheet of a new workbook at `path`
pub fn write_worksheet(path: &Path, sheet_name: &str, table: &Table) -> TasklyticsResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| TasklyticsError::Excel(format!("Failed to set worksheet name: {}", e)))?;

    for (r, row) in table.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            write_cell(worksheet, r, c, cell)?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| TasklyticsError::Excel(format!("Failed to save {}: {}", path.display(), e)))?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: usize,
    col: usize,
    cell: &Cell,
) -> TasklyticsResult<()> {
    let (row, col) = cell_position(row, col)?;
    match cell {
        Cell::Empty => {}
        Cell::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        Cell::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn cell_position(row: usize, col: usize) -> TasklyticsResult<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| TasklyticsError::Excel(format!("Row {} out of range", row)))?;
    let col = u16::try_from(col)
        .map_err(|_| TasklyticsError::Excel(format!("Column {} out of range", col)))?;
    Ok((row, col))
}

/// Exports the per-category summary to a formatted workbook
pub struct SummaryExporter {
    totals: Vec<CategoryTotal>,
}

impl SummaryExporter {
    pub fn new(totals: Vec<CategoryTotal>) -> Self {
        Self { totals }
    }

    pub fn export(&self, output_path: &Path) -> TasklyticsResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let money_format = Format::new().set_num_format("#,##0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Summary")?;
        worksheet.write_string_with_format(0, 0, "category", &header_format)?;
        worksheet.write_string_with_format(0, 1, "revenue", &header_format)?;

        for (i, total) in self.totals.iter().enumerate() {
            let (row, _) = cell_position(i + 1, 0)?;
            worksheet.write_string(row, 0, &total.category)?;
            worksheet.write_number_with_format(row, 1, total.total, &money_format)?;
        }

        let grand_total: f64 = self.totals.iter().map(|t| t.total).sum();
        let (row, _) = cell_position(self.totals.len() + 1, 0)?;
        worksheet.write_string_with_format(row, 0, "Total", &header_format)?;
        worksheet.write_number_with_format(row, 1, grand_total, &money_format)?;

        worksheet.set_column_width(0, 24)?;
        worksheet.set_column_width(1, 16)?;

        workbook.save(output_path).map_err(|e| {
            TasklyticsError::Excel(format!("Failed to save {}: {}", output_path.display(), e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::read_worksheet;
    use tempfile::TempDir;

    #[test]
    fn test_summary_export_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.xlsx");
        SummaryExporter::new(vec![
            CategoryTotal::new("Electronics", 100000.0),
            CategoryTotal::new("Books", 48000.0),
        ])
        .export(&path)
        .unwrap();

        let table = read_worksheet(&path, Some("Summary")).unwrap().unwrap();
        assert_eq!(table.header_labels(), vec!["category", "revenue"]);
        assert_eq!(table.cell(2, 0), &Cell::from("Books"));
        assert_eq!(table.cell(3, 0), &Cell::from("Total"));
        assert_eq!(table.cell(3, 1), &Cell::Number(148000.0));
    }

    #[test]
    fn test_invalid_sheet_name() {
        let dir = TempDir::new().unwrap();
        let err = write_worksheet(&dir.path().join("x.xlsx"), "bad[name]", &Table::default())
            .unwrap_err();
        assert!(matches!(err, TasklyticsError::Excel(_)));
    }
}
