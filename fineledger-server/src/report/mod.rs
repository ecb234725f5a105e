//! Report generators
//!
//! Serializes ledger query results into downloadable documents:
//! - pdf: monthly per-member report
//! - chart: outstanding-per-member bar chart

pub mod chart;
pub mod pdf;
