//! fineledger-server: HTTP server for a shared fine ledger
//!
//! Tracks per-person violation counts, converts them into fines at a flat
//! rate, records payments against those fines, and renders PDF and chart
//! reports from the ledger.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod routes;
pub mod server;
pub mod views;

pub use config::AppConfig;
pub use db::Database;
pub use error::{ServerError, ServerResult};
pub use server::{create_router, run_server, AppState, ServerArgs};
