//! CLI command handlers

pub mod commands;

pub use commands::{aggregate, growth, insight, sync, upload, watch};
