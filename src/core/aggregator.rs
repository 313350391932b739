//! Revenue aggregation
//!
//! Two modes:
//! - initial aggregation of a flat sales table into per-category totals
//!   (`units × unit_price`, summed per category, first-seen order)
//! - growth aggregation of the dashboard sheet (latest vs previous period)

use crate::config::{DuplicateCategoryPolicy, SyncConfig};
use crate::core::classifier::{Classification, ColumnClassifier};
use crate::core::number::NumberParser;
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::types::{
    category_at, category_key, row_cell, CategoryTotal, Cell, GrowthRecord, SyncRecord, Table,
};
use regex::Regex;

/// Column `upload` writes totals into, ahead of any period column
const REVENUE_COLUMN: usize = 1;

/// Columns of a flat source table used by the initial aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceColumns {
    pub category: usize,
    pub value: usize,
    /// `None` means every row counts as one unit
    pub units: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    parser: NumberParser,
    classifier: ColumnClassifier,
    config: SyncConfig,
    value_pattern: Regex,
    units_pattern: Regex,
}

impl Aggregator {
    pub fn new(config: &SyncConfig) -> TasklyticsResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                TasklyticsError::Config(format!("Invalid column pattern '{}': {}", pattern, e))
            })
        };
        Ok(Self {
            parser: NumberParser::from_config(config),
            classifier: ColumnClassifier::from_config(config),
            config: config.clone(),
            value_pattern: compile(&config.value_pattern)?,
            units_pattern: compile(&config.units_pattern)?,
        })
    }

    /// Locate category, value and units columns from a source header
    pub fn detect_columns(&self, header: &[Cell]) -> SourceColumns {
        let labels: Vec<String> = header
            .iter()
            .map(|c| c.to_string().trim().to_lowercase())
            .collect();
        let named = |name: &str| {
            let name = name.trim().to_lowercase();
            labels.iter().position(|l| !name.is_empty() && *l == name)
        };

        let category = named(&self.config.category_column).unwrap_or(0);
        let value = named(&self.config.value_column)
            .or_else(|| {
                labels
                    .iter()
                    .enumerate()
                    .position(|(i, l)| i != category && self.value_pattern.is_match(l))
            })
            .unwrap_or(1);
        let units = named(&self.config.units_column).or_else(|| {
            labels
                .iter()
                .enumerate()
                .position(|(i, l)| i != category && i != value && self.units_pattern.is_match(l))
        });

        SourceColumns {
            category,
            value,
            units,
        }
    }

    /// Per-category revenue totals in first-seen order
    pub fn aggregate_totals(&self, table: &Table) -> Vec<CategoryTotal> {
        self.sync_record(table)
            .iter()
            .map(|(category, total)| CategoryTotal::new(category, total))
            .collect()
    }

    /// Totals keyed by category, combining duplicates per config
    pub fn sync_record(&self, table: &Table) -> SyncRecord {
        let columns = self.detect_columns(table.header());
        let mut record = SyncRecord::new();

        for row in table.data_rows() {
            let units = columns
                .units
                .map(|col| self.parser.parse(row_cell(row, col)))
                .unwrap_or(1.0);
            let price = self.parser.parse(row_cell(row, columns.value));
            let category = category_at(row, columns.category);

            match self.config.duplicate_categories {
                DuplicateCategoryPolicy::Sum => record.add(category, units * price),
                DuplicateCategoryPolicy::First => record.insert_first(category, units * price),
            }
        }

        record
    }

    /// Growth records for a dashboard table, empty when no observation column qualifies
    pub fn growth_view(&self, table: &Table) -> Vec<GrowthRecord> {
        let classification = self.classifier.classify_table(table);
        self.growth(table, classification)
    }

    pub fn growth(&self, table: &Table, classification: Classification) -> Vec<GrowthRecord> {
        let Some(last_index) = classification.last_index else {
            return Vec::new();
        };
        let period_label = table.header_label(last_index);

        table
            .data_rows()
            .iter()
            .map(|row| {
                let latest = self.parser.parse(row_cell(row, last_index));
                let previous = classification
                    .previous_index
                    .map(|col| self.parser.parse(row_cell(row, col)))
                    .unwrap_or(0.0);
                GrowthRecord {
                    category: category_key(row),
                    latest,
                    previous,
                    growth: growth_percent(latest, previous),
                    period_label: period_label.clone(),
                }
            })
            .collect()
    }

    /// Records the dashboard insight is computed over.
    ///
    /// Matches `growth_view` once a period column qualifies. Right after an
    /// upload the sheet is still `category | revenue`, so the revenue column
    /// stands in as the latest values.
    pub fn insight_view(&self, table: &Table) -> Vec<GrowthRecord> {
        let records = self.growth_view(table);
        if !records.is_empty() || self.config.reserved_columns <= REVENUE_COLUMN {
            return records;
        }

        let values: Vec<f64> = table
            .data_rows()
            .iter()
            .map(|row| self.parser.parse(row_cell(row, REVENUE_COLUMN)))
            .collect();
        if values.iter().all(|v| *v == 0.0) {
            return Vec::new();
        }

        let period_label = table.header_label(REVENUE_COLUMN);
        table
            .data_rows()
            .iter()
            .zip(values)
            .map(|(row, latest)| GrowthRecord {
                category: category_key(row),
                latest,
                previous: 0.0,
                growth: None,
                period_label: period_label.clone(),
            })
            .collect()
    }
}

/// Percentage change rounded to two decimals; `None` without a baseline
pub fn growth_percent(latest: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let pct = (latest - previous) / previous * 100.0;
    Some((pct * 100.0).round() / 100.0)
}
