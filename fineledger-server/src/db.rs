//! SQLite database layer for the fine ledger
//!
//! Uses rusqlite with an idempotent schema migration on startup. A single
//! connection is shared behind a mutex; each operation acquires it for the
//! duration of its statement and releases it on return.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::ServerResult;
use crate::models::{FineRecord, NameTotal, PaymentTarget};

/// Thread-safe database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> ServerResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get the database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get database file size in bytes
    pub fn size_bytes(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Run schema migrations
    fn run_migrations(&self) -> ServerResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(INDEXES)?;

        Ok(())
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// List all fine records, newest first, with outstanding computed at
    /// the given rate.
    pub fn list_records(&self, rate: i64) -> ServerResult<Vec<FineRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, violations, amount_paid, date,
                   (violations * ?1) - amount_paid AS outstanding
            FROM fines
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let records = stmt
            .query_map(params![rate], |row| {
                Ok(FineRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    violations: row.get(2)?,
                    amount_paid: row.get(3)?,
                    date: parse_date(row.get::<_, String>(4)?),
                    outstanding: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Aggregate outstanding fine per member.
    pub fn totals_by_name(&self, rate: i64) -> ServerResult<Vec<NameTotal>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT name, SUM((violations * ?1) - amount_paid) AS outstanding
            FROM fines
            GROUP BY name
            ORDER BY name
            "#,
        )?;

        let totals = stmt
            .query_map(params![rate], |row| {
                Ok(NameTotal {
                    name: row.get(0)?,
                    outstanding: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Insert a new record with nothing paid yet. Returns the assigned id.
    pub fn insert_record(&self, name: &str, violations: i64, date: NaiveDate) -> ServerResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO fines (name, violations, amount_paid, date) VALUES (?, ?, 0, ?)",
            params![name, violations, format_date(date)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Identifying fields of a record, for the payment form.
    pub fn payment_target(&self, id: i64) -> ServerResult<Option<PaymentTarget>> {
        let conn = self.conn.lock().unwrap();
        let target = conn
            .query_row(
                "SELECT id, name FROM fines WHERE id = ?",
                params![id],
                |row| {
                    Ok(PaymentTarget {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(target)
    }

    /// Add a payment to a record. Returns false when no row matched.
    pub fn record_payment(&self, id: i64, amount: i64) -> ServerResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute(
            "UPDATE fines SET amount_paid = amount_paid + ? WHERE id = ?",
            params![amount, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a record. Returns false when no row matched.
    pub fn delete_record(&self, id: i64) -> ServerResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM fines WHERE id = ?", params![id])?;
        Ok(rows_affected > 0)
    }

    /// Records for one member in a given month/year, in insertion order.
    pub fn monthly_records(
        &self,
        name: &str,
        month: u32,
        year: i32,
        rate: i64,
    ) -> ServerResult<Vec<FineRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, violations, amount_paid, date,
                   (violations * ?1) - amount_paid AS outstanding
            FROM fines
            WHERE name = ?2
              AND strftime('%m', date) = ?3
              AND strftime('%Y', date) = ?4
            ORDER BY id ASC
            "#,
        )?;

        let records = stmt
            .query_map(
                params![rate, name, format!("{:02}", month), year.to_string()],
                |row| {
                    Ok(FineRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        violations: row.get(2)?,
                        amount_paid: row.get(3)?,
                        date: parse_date(row.get::<_, String>(4)?),
                        outstanding: row.get(5)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

// ============================================================================
// Schema
// ============================================================================

const SCHEMA: &str = r#"
-- Fine records table
CREATE TABLE IF NOT EXISTS fines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    violations INTEGER NOT NULL DEFAULT 0,
    amount_paid INTEGER NOT NULL DEFAULT 0,
    date TEXT NOT NULL
);
"#;

const INDEXES: &str = r#"
-- Indexes for the summary and report queries
CREATE INDEX IF NOT EXISTS idx_fines_date ON fines(date DESC);
CREATE INDEX IF NOT EXISTS idx_fines_name ON fines(name);
"#;

// ============================================================================
// Helpers
// ============================================================================

fn parse_date(s: String) -> NaiveDate {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .unwrap_or_else(|_| chrono::Local::now().date_naive())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
