//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the coordinator with mock implementations.

use crate::db::{ConversationRecord, Database, DbResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Durable storage for conversation records, keyed by thread ID
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the record for a thread. Fails with `ConversationNotFound`
    /// for threads never written.
    async fn get(&self, thread_id: &str) -> DbResult<ConversationRecord>;

    /// Write a record if the stored version still equals `expected_version`
    /// (`None` means the record must not exist yet). Fails with
    /// `VersionConflict` otherwise.
    async fn put(
        &self,
        record: &ConversationRecord,
        expected_version: Option<i64>,
    ) -> DbResult<ConversationRecord>;

    /// Fresh default record for an unseen thread; not persisted
    fn create_default(&self, thread_id: &str) -> ConversationRecord {
        ConversationRecord::new_default(thread_id)
    }
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ConversationStore + ?Sized> ConversationStore for Arc<T> {
    async fn get(&self, thread_id: &str) -> DbResult<ConversationRecord> {
        (**self).get(thread_id).await
    }

    async fn put(
        &self,
        record: &ConversationRecord,
        expected_version: Option<i64>,
    ) -> DbResult<ConversationRecord> {
        (**self).put(record, expected_version).await
    }

    fn create_default(&self, thread_id: &str) -> ConversationRecord {
        (**self).create_default(thread_id)
    }
}

// ============================================================================
// Production Implementations
// ============================================================================

/// Adapter to use Database as `ConversationStore`
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ConversationStore for DatabaseStorage {
    async fn get(&self, thread_id: &str) -> DbResult<ConversationRecord> {
        self.db.get_conversation(thread_id)
    }

    async fn put(
        &self,
        record: &ConversationRecord,
        expected_version: Option<i64>,
    ) -> DbResult<ConversationRecord> {
        self.db.put_conversation(record, expected_version)
    }
}
