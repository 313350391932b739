//! Remote spreadsheet backends
//!
//! The sync engine only needs four operations on the dashboard worksheet.
//! Row and column numbers are 1-based, matching spreadsheet conventions.

mod credentials;
mod google;
mod memory;
mod xlsx;

pub use credentials::{CommandToken, CredentialProvider, EnvToken, StaticToken};
pub use google::GoogleSheetsClient;
pub use memory::MemorySheet;
pub use xlsx::XlsxSheet;

use crate::config::{AppConfig, RemoteKind};
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::types::{Cell, Table};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Read the whole worksheet, header row first
    async fn get_all_values(&self) -> TasklyticsResult<Table>;

    /// Write one cell (1-based row and column)
    async fn update_cell(&self, row: usize, col: usize, value: &Cell) -> TasklyticsResult<()>;

    /// Remove every value from the worksheet
    async fn clear(&self) -> TasklyticsResult<()>;

    /// Overwrite the worksheet starting at A1
    async fn update(&self, rows: &[Vec<Cell>]) -> TasklyticsResult<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Build the configured backend; done once at process start
pub fn open_backend(config: &AppConfig) -> TasklyticsResult<Box<dyn SheetBackend>> {
    let remote = &config.remote;
    match remote.kind {
        RemoteKind::Google => {
            if remote.spreadsheet_id.trim().is_empty() {
                return Err(TasklyticsError::Config(
                    "remote.spreadsheet_id is required for the google backend \
                     (or set TASKLYTICS_SPREADSHEET_ID)"
                        .to_string(),
                ));
            }
            let credentials: Box<dyn CredentialProvider> = match &config.credentials.token_command
            {
                Some(command) => Box::new(
                    CommandToken::new(command.clone())
                        .with_timeout(Duration::from_secs(remote.timeout_secs)),
                ),
                None => Box::new(EnvToken::new(config.credentials.token_env.clone())),
            };
            let client = GoogleSheetsClient::new(
                remote.spreadsheet_id.clone(),
                remote.worksheet.clone(),
                credentials,
                Duration::from_secs(remote.timeout_secs),
            )?
            .with_base_url(remote.base_url.clone());
            Ok(Box::new(client))
        }
        RemoteKind::Xlsx => {
            let path = remote
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from("dashboard.xlsx"));
            Ok(Box::new(XlsxSheet::new(path, remote.worksheet.clone())))
        }
    }
}

/// Convert a 0-based column index to letters (0→A, 25→Z, 26→AA)
pub fn column_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// A1 reference for a 1-based row and column
pub fn a1_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_letter(col - 1), row)
}

pub(crate) fn check_position(row: usize, col: usize) -> TasklyticsResult<()> {
    if row == 0 || col == 0 {
        return Err(TasklyticsError::Validation(format!(
            "Cell positions are 1-based, got row {} col {}",
            row, col
        )));
    }
    Ok(())
}
