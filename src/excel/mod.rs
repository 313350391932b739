//! Spreadsheet file I/O
//!
//! - Import: .xlsx/.xls/.ods → `Table` (sales source, local dashboard workbook)
//! - Export: `Table` / category totals → .xlsx

mod exporter;
mod importer;

pub use exporter::{write_worksheet, SummaryExporter};
pub use importer::{cell_from_data, read_worksheet, table_from_range, SourceReader};
