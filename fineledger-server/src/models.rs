//! Request and response models for fineledger-server

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Ledger records
// ============================================================================

/// A single fine record with its derived outstanding amount.
///
/// `outstanding` is computed in SQL as `violations * rate - amount_paid`
/// and may be negative when a record has been overpaid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineRecord {
    pub id: i64,
    pub name: String,
    pub violations: i64,
    pub amount_paid: i64,
    pub date: NaiveDate,
    pub outstanding: i64,
}

/// Aggregate outstanding fine for one member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameTotal {
    pub name: String,
    pub outstanding: i64,
}

/// Identifying fields of a record, shown in the payment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTarget {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// Form and query payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFineRequest {
    pub name: String,
    pub violations: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub name: String,
    pub month: u32,
    pub year: i32,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub path: String,
    pub size_bytes: Option<u64>,
}
