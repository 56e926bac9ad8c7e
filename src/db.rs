//! Database module for threadline
//!
//! Provides durable storage for per-thread conversation records.

mod schema;

pub use schema::*;

use crate::state_machine::state::UnknownState;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
    #[error("Version conflict on {thread_id}: expected {expected:?}, found {actual:?}")]
    VersionConflict {
        thread_id: String,
        expected: Option<i64>,
        actual: Option<i64>,
    },
    #[error("Corrupt record for {thread_id}: {reason}")]
    Corrupt { thread_id: String, reason: String },
    #[error("Database connection lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        // WAL plus FULL sync: a committed write survives a crash, an
        // uncommitted one leaves no trace.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    /// Run raw SQL against the connection (for seeding test fixtures)
    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> DbResult<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    /// Flush the write-ahead log into the main database file.
    ///
    /// Called once at shutdown; safe to call at any time.
    pub fn checkpoint(&self) -> DbResult<()> {
        let conn = self.conn()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }

    // ==================== Conversation Operations ====================

    /// Get conversation record by thread ID
    pub fn get_conversation(&self, thread_id: &str) -> DbResult<ConversationRecord> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT thread_id, state, captured_name, version, created_at, updated_at
                 FROM conversations WHERE thread_id = ?1",
                params![thread_id],
                read_row,
            )
            .optional()?;

        match row {
            Some(raw) => raw.into_record(),
            None => Err(DbError::ConversationNotFound(thread_id.to_string())),
        }
    }

    /// List all conversation records, most recently updated first
    pub fn list_conversations(&self) -> DbResult<Vec<ConversationRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT thread_id, state, captured_name, version, created_at, updated_at
             FROM conversations ORDER BY updated_at DESC",
        )?;

        let rows = stmt.query_map([], read_row)?;
        rows.map(|row| row.map_err(DbError::from).and_then(RawRecord::into_record))
            .collect()
    }

    /// Conditionally write a conversation record.
    ///
    /// The write only lands if the stored version equals `expected_version`,
    /// or, when `expected_version` is `None`, if no row exists yet. The check
    /// and the write share one immediate transaction. Returns the record as
    /// stored, with its bumped version and fresh `updated_at`.
    pub fn put_conversation(
        &self,
        record: &ConversationRecord,
        expected_version: Option<i64>,
    ) -> DbResult<ConversationRecord> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<i64> = tx
            .query_row(
                "SELECT version FROM conversations WHERE thread_id = ?1",
                params![record.thread_id],
                |row| row.get(0),
            )
            .optional()?;

        if current != expected_version {
            return Err(DbError::VersionConflict {
                thread_id: record.thread_id.clone(),
                expected: expected_version,
                actual: current,
            });
        }

        let now = Utc::now();
        let new_version = current.unwrap_or(0) + 1;
        let created_at = if current.is_some() {
            record.created_at
        } else {
            now
        };

        tx.execute(
            "INSERT INTO conversations (thread_id, state, captured_name, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(thread_id) DO UPDATE SET
                state = excluded.state,
                captured_name = excluded.captured_name,
                version = excluded.version,
                updated_at = excluded.updated_at",
            params![
                record.thread_id,
                record.state.as_str(),
                record.captured_name,
                new_version,
                format_datetime(created_at),
                format_datetime(now),
            ],
        )?;
        tx.commit()?;

        Ok(ConversationRecord {
            thread_id: record.thread_id.clone(),
            state: record.state,
            captured_name: record.captured_name.clone(),
            version: new_version,
            created_at,
            updated_at: now,
        })
    }
}

/// Row as read from SQLite, before state validation
struct RawRecord {
    thread_id: String,
    state: String,
    captured_name: Option<String>,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl RawRecord {
    fn into_record(self) -> DbResult<ConversationRecord> {
        let state: ConvState = self
            .state
            .parse()
            .map_err(|e: UnknownState| corrupt(&self.thread_id, e.to_string()))?;
        if state.has_captured_name() != self.captured_name.is_some() {
            return Err(corrupt(
                &self.thread_id,
                format!("captured_name does not match state {state}"),
            ));
        }
        // Version 0 is reserved for records that were never written
        if self.version < 1 {
            return Err(corrupt(
                &self.thread_id,
                format!("stored version {} is not positive", self.version),
            ));
        }
        let created_at = parse_datetime(&self.thread_id, "created_at", &self.created_at)?;
        let updated_at = parse_datetime(&self.thread_id, "updated_at", &self.updated_at)?;

        Ok(ConversationRecord {
            state,
            captured_name: self.captured_name,
            version: self.version,
            created_at,
            updated_at,
            thread_id: self.thread_id,
        })
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        thread_id: row.get(0)?,
        state: row.get(1)?,
        captured_name: row.get(2)?,
        version: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn corrupt(thread_id: &str, reason: impl Into<String>) -> DbError {
    DbError::Corrupt {
        thread_id: thread_id.to_string(),
        reason: reason.into(),
    }
}

/// Fixed-width UTC timestamps, so text order matches time order
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_datetime(thread_id: &str, field: &str, s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(thread_id, format!("invalid {field} {s:?}: {e}")))
}
