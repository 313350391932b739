//! Observation column detection
//!
//! The dashboard sheet is laid out as `category | revenue | day-1 | … | day-N`,
//! with one column appended per sync. Columns past the reserved prefix count as
//! observations only if at least one row parses to a non-zero value; all-zero
//! columns (a sync that failed to populate) are skipped when picking the
//! latest and previous periods.

use crate::config::SyncConfig;
use crate::core::number::NumberParser;
use crate::types::{row_cell, Cell, Table};

/// Positions of the latest and previous observation columns (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub last_index: Option<usize>,
    pub previous_index: Option<usize>,
}

impl Classification {
    /// No qualifying column means "no data", not an error
    pub fn has_data(&self) -> bool {
        self.last_index.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    parser: NumberParser,
    reserved_columns: usize,
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

impl ColumnClassifier {
    pub fn new(parser: NumberParser, reserved_columns: usize) -> Self {
        Self {
            parser,
            reserved_columns,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(NumberParser::from_config(config), config.reserved_columns)
    }

    /// All qualifying observation columns, in header order
    pub fn observation_columns(&self, header: &[Cell], rows: &[Vec<Cell>]) -> Vec<usize> {
        (self.reserved_columns..header.len())
            .filter(|&col| {
                rows.iter()
                    .any(|row| self.parser.parse(row_cell(row, col)) != 0.0)
            })
            .collect()
    }

    pub fn classify(&self, header: &[Cell], rows: &[Vec<Cell>]) -> Classification {
        let columns = self.observation_columns(header, rows);
        let mut rightmost = columns.iter().rev().copied();
        Classification {
            last_index: rightmost.next(),
            previous_index: rightmost.next(),
        }
    }

    pub fn classify_table(&self, table: &Table) -> Classification {
        self.classify(table.header(), table.data_rows())
    }
}

/// Classify with the default layout (two reserved columns)
pub fn classify(header: &[Cell], rows: &[Vec<Cell>]) -> Classification {
    ColumnClassifier::default().classify(header, rows)
}
