//! Incremental sync of one period into the dashboard worksheet
//!
//! Each run re-reads the whole remote table, then appends the period label as a
//! new header cell and writes one value per matching category row. Existing
//! columns are never reordered or overwritten. Runs are not atomic against a
//! concurrent writer: callers keep at most one sync in flight.

use crate::config::{DuplicatePeriodPolicy, NewCategoryPolicy, SyncConfig};
use crate::core::aggregator::Aggregator;
use crate::core::insight::{generate_insight, Insight};
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::remote::SheetBackend;
use crate::types::{category_key, CategoryTotal, Cell, GrowthRecord, SyncRecord, Table};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Result of one sync run that reached a decision.
///
/// Transport and auth failures are returned as `Err` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    Success {
        /// 1-based column the period was written to
        column: usize,
        label: String,
        rows_written: usize,
        /// Remote rows whose category had no value this period (left empty)
        rows_missing: usize,
        /// Rows added for unseen categories (`new_categories: append`)
        appended: usize,
    },
    /// The label is already in the header; nothing was written
    DuplicatePeriod { label: String, column: usize },
    /// The source had no data rows; nothing was written
    InsufficientSourceData { data_rows: usize },
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Success {
                column,
                label,
                rows_written,
                rows_missing,
                appended,
            } => {
                write!(
                    f,
                    "wrote '{}' to column {} ({} rows, {} without data",
                    label, column, rows_written, rows_missing
                )?;
                if *appended > 0 {
                    write!(f, ", {} appended", appended)?;
                }
                write!(f, ")")
            }
            SyncOutcome::DuplicatePeriod { label, column } => write!(
                f,
                "period '{}' already exists in column {}; sheet left unchanged",
                label, column
            ),
            SyncOutcome::InsufficientSourceData { data_rows } => write!(
                f,
                "source has {} data rows; need a header and at least one row",
                data_rows
            ),
        }
    }
}

/// Drives the dashboard worksheet through a backend handle owned by the caller
pub struct SyncEngine<'a> {
    backend: &'a dyn SheetBackend,
    config: SyncConfig,
    aggregator: Aggregator,
}

impl<'a> SyncEngine<'a> {
    pub fn new(backend: &'a dyn SheetBackend, config: SyncConfig) -> TasklyticsResult<Self> {
        let aggregator = Aggregator::new(&config)?;
        Ok(Self {
            backend,
            config,
            aggregator,
        })
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Aggregate a flat source table and merge it as period `label`
    pub async fn sync_from_source(
        &self,
        source: &Table,
        label: &str,
    ) -> TasklyticsResult<SyncOutcome> {
        if source.len() < 2 {
            info!(rows = source.len(), "source table has no data rows");
            return Ok(SyncOutcome::InsufficientSourceData {
                data_rows: source.len().saturating_sub(1),
            });
        }
        let record = self.aggregator.sync_record(source);
        self.sync(label, &record).await
    }

    /// Merge one period's values into the remote table by category key
    pub async fn sync(&self, label: &str, record: &SyncRecord) -> TasklyticsResult<SyncOutcome> {
        if label.trim().is_empty() {
            return Err(TasklyticsError::Validation(
                "Period label must not be empty".to_string(),
            ));
        }
        if record.is_empty() {
            info!("nothing to sync for '{}'", label);
            return Ok(SyncOutcome::InsufficientSourceData { data_rows: 0 });
        }

        let remote = self.backend.get_all_values().await?;
        let header_len = remote.header_len();
        if header_len == 0 {
            return Err(TasklyticsError::Validation(format!(
                "{} has no header row; upload an initial summary first",
                self.backend.describe()
            )));
        }

        let existing = remote
            .header()
            .iter()
            .position(|cell| cell.to_string() == label);

        let column = match (existing, self.config.duplicate_period) {
            (Some(index), DuplicatePeriodPolicy::Refuse) => {
                info!("period '{}' already synced in column {}", label, index + 1);
                return Ok(SyncOutcome::DuplicatePeriod {
                    label: label.to_string(),
                    column: index + 1,
                });
            }
            (Some(index), DuplicatePeriodPolicy::Rewrite) => {
                info!("rewriting period '{}' in column {}", label, index + 1);
                index + 1
            }
            (None, _) => {
                let column = header_len + 1;
                self.backend
                    .update_cell(1, column, &Cell::from(label))
                    .await?;
                column
            }
        };

        let mut rows_written = 0;
        let mut rows_missing = 0;
        let mut remote_categories = HashSet::new();

        for (i, row) in remote.data_rows().iter().enumerate() {
            let category = category_key(row);
            match record.get(&category) {
                Some(value) => {
                    self.backend
                        .update_cell(i + 2, column, &Cell::Number(value))
                        .await?;
                    rows_written += 1;
                }
                None => {
                    debug!(%category, row = i + 2, "no value this period, cell left empty");
                    rows_missing += 1;
                }
            }
            remote_categories.insert(category);
        }

        let mut appended = 0;
        for (category, value) in record.iter() {
            if remote_categories.contains(category) {
                continue;
            }
            match self.config.new_categories {
                NewCategoryPolicy::Skip => {
                    debug!(%category, "category not in remote table, skipped");
                }
                NewCategoryPolicy::Append => {
                    let row = remote.len() + appended + 1;
                    self.backend
                        .update_cell(row, 1, &Cell::from(category))
                        .await?;
                    self.backend
                        .update_cell(row, column, &Cell::Number(value))
                        .await?;
                    appended += 1;
                }
            }
        }

        info!(
            backend = %self.backend.describe(),
            column,
            rows_written,
            rows_missing,
            appended,
            "synced period '{}'",
            label
        );

        Ok(SyncOutcome::Success {
            column,
            label: label.to_string(),
            rows_written,
            rows_missing,
            appended,
        })
    }

    /// Replace the worksheet with a fresh `category | revenue` summary
    pub async fn upload(&self, totals: &[CategoryTotal]) -> TasklyticsResult<usize> {
        let mut rows = Vec::with_capacity(totals.len() + 1);
        rows.push(vec![Cell::from("category"), Cell::from("revenue")]);
        rows.extend(
            totals
                .iter()
                .map(|t| vec![Cell::from(t.category.as_str()), Cell::Number(t.total)]),
        );

        self.backend.clear().await?;
        self.backend.update(&rows).await?;
        info!(backend = %self.backend.describe(), categories = totals.len(), "uploaded summary");
        Ok(totals.len())
    }

    /// Growth view of the remote table; empty when no period qualifies
    pub async fn growth(&self) -> TasklyticsResult<Vec<GrowthRecord>> {
        let remote = self.backend.get_all_values().await?;
        Ok(self.aggregator.growth_view(&remote))
    }

    /// Insight over the latest period, or the uploaded revenue before the first sync
    pub async fn insight(&self) -> TasklyticsResult<Insight> {
        let remote = self.backend.get_all_values().await?;
        Ok(generate_insight(&self.aggregator.insight_view(&remote)))
    }
}

/// Period label for "now" in local time
pub fn default_period_label(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}
