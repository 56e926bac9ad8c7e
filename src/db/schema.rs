//! Database schema and types

pub use crate::state_machine::state::ConvState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS conversations (
    thread_id TEXT PRIMARY KEY,
    state TEXT NOT NULL DEFAULT 'NEW',
    captured_name TEXT,
    version INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_conversations_updated ON conversations(updated_at DESC);
";

/// Durable per-thread conversation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub thread_id: String,
    pub state: ConvState,
    pub captured_name: Option<String>,
    /// Optimistic lock counter; 0 means never persisted
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    /// Fresh record for a thread we have never seen. Not persisted.
    pub fn new_default(thread_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            thread_id: thread_id.into(),
            state: ConvState::New,
            captured_name: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Version to hand to a conditional write of this record
    pub fn expected_version(&self) -> Option<i64> {
        (self.version > 0).then_some(self.version)
    }
}
