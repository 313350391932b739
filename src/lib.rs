//! Tasklytics - sales sheet aggregation and incremental dashboard sync
//!
//! This library reads a flat sales table, computes per-category revenue,
//! and keeps a hosted dashboard worksheet up to date by appending one column
//! per period without touching earlier columns.
//!
//! # Features
//!
//! - Lenient numeric parsing of spreadsheet cells (currency symbols, separators)
//! - Rightmost-qualifying period detection for growth views
//! - Append-only sync keyed by category, with configurable policies
//! - Google Sheets, local xlsx and in-memory backends
//!
//! # Example
//!
//! ```no_run
//! use tasklytics::config::AppConfig;
//! use tasklytics::core::SyncEngine;
//! use tasklytics::excel::SourceReader;
//! use tasklytics::remote::open_backend;
//!
//! # async fn run() -> tasklytics::TasklyticsResult<()> {
//! let config = AppConfig::load(None)?;
//! let backend = open_backend(&config)?;
//! let source = SourceReader::new(&config.source).read()?;
//!
//! let engine = SyncEngine::new(backend.as_ref(), config.sync.clone())?;
//! let outcome = engine.sync_from_source(&source, "Feb").await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod remote;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, SyncConfig};
pub use error::{TasklyticsError, TasklyticsResult};
pub use types::{CategoryTotal, Cell, GrowthRecord, SyncRecord, Table};
