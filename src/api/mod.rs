//! Tasklytics API Server module
//!
//! Serves the dashboard data and the sync trigger over HTTP.
//! Run with `tasklytics-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
