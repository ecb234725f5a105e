//! Route handlers for fineledger-server
//!
//! Organized by concern:
//! - summary: ledger overview page
//! - fines: create, pay, delete
//! - reports: PDF export and chart
//! - health: health check endpoint

pub mod fines;
pub mod health;
pub mod reports;
pub mod summary;

pub use fines::*;
pub use health::*;
pub use reports::*;
pub use summary::*;
