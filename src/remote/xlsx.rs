use super::{check_position, SheetBackend};
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::excel::{read_worksheet, write_worksheet};
use crate::types::{Cell, Table};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A local workbook standing in for the hosted sheet.
///
/// Every mutation rewrites the file with a single worksheet; other sheets in
/// the workbook are not preserved.
#[derive(Debug, Clone)]
pub struct XlsxSheet {
    path: PathBuf,
    worksheet: String,
}

impl XlsxSheet {
    pub fn new(path: impl Into<PathBuf>, worksheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            worksheet: worksheet.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> TasklyticsResult<Table> {
        if !self.path.exists() {
            return Ok(Table::default());
        }
        Ok(read_worksheet(&self.path, Some(&self.worksheet))?.unwrap_or_default())
    }

    fn write(&self, table: &Table) -> TasklyticsResult<()> {
        debug!(path = %self.path.display(), rows = table.len(), "rewriting workbook");
        write_worksheet(&self.path, &self.worksheet, table)
    }

    /// Run workbook I/O off the async worker threads
    async fn blocking<T, F>(&self, op: F) -> TasklyticsResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&XlsxSheet) -> TasklyticsResult<T> + Send + 'static,
    {
        let sheet = self.clone();
        tokio::task::spawn_blocking(move || op(&sheet))
            .await
            .map_err(|e| TasklyticsError::Io(std::io::Error::other(e.to_string())))?
    }
}

#[async_trait]
impl SheetBackend for XlsxSheet {
    async fn get_all_values(&self) -> TasklyticsResult<Table> {
        self.blocking(|sheet| sheet.read()).await
    }

    async fn update_cell(&self, row: usize, col: usize, value: &Cell) -> TasklyticsResult<()> {
        check_position(row, col)?;
        let value = value.clone();
        self.blocking(move |sheet| {
            let mut table = sheet.read()?;
            table.set(row - 1, col - 1, value);
            sheet.write(&table)
        })
        .await
    }

    async fn clear(&self) -> TasklyticsResult<()> {
        self.blocking(|sheet| sheet.write(&Table::default())).await
    }

    async fn update(&self, rows: &[Vec<Cell>]) -> TasklyticsResult<()> {
        let rows = rows.to_vec();
        self.blocking(move |sheet| {
            let mut table = sheet.read()?;
            for (r, row) in rows.into_iter().enumerate() {
                for (c, cell) in row.into_iter().enumerate() {
                    table.set(r, c, cell);
                }
            }
            sheet.write(&table)
        })
        .await
    }

    fn describe(&self) -> String {
        format!("workbook {} [{}]", self.path.display(), self.worksheet)
    }
}
