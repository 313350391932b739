use super::{check_position, SheetBackend};
use crate::error::TasklyticsResult;
use crate::types::{Cell, Table};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// In-process worksheet, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemorySheet {
    table: Mutex<Table>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: Table) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Table {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SheetBackend for MemorySheet {
    async fn get_all_values(&self) -> TasklyticsResult<Table> {
        Ok(self.snapshot())
    }

    async fn update_cell(&self, row: usize, col: usize, value: &Cell) -> TasklyticsResult<()> {
        check_position(row, col)?;
        self.lock().set(row - 1, col - 1, value.clone());
        Ok(())
    }

    async fn clear(&self) -> TasklyticsResult<()> {
        *self.lock() = Table::default();
        Ok(())
    }

    async fn update(&self, rows: &[Vec<Cell>]) -> TasklyticsResult<()> {
        let mut table = self.lock();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                table.set(r, c, cell.clone());
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory worksheet".to_string()
    }
}
