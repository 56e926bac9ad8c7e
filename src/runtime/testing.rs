//! Mock implementations for testing
//!
//! These mocks enable coordinator testing without real I/O.

use super::traits::ConversationStore;
use crate::db::{ConversationRecord, DbError, DbResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory store with the same conditional-write rules as the database
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<String, ConversationRecord>>,
    /// Delay inserted between reading and returning a record
    read_delay: Option<Duration>,
    /// Number of successful writes
    pub writes: AtomicUsize,
    /// Number of rejected writes
    pub conflicts: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow down every read, widening any read-modify-write race window
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn snapshot(&self, thread_id: &str) -> Option<ConversationRecord> {
        self.records.lock().unwrap().get(thread_id).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn get(&self, thread_id: &str) -> DbResult<ConversationRecord> {
        let record = self.snapshot(thread_id);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        record.ok_or_else(|| DbError::ConversationNotFound(thread_id.to_string()))
    }

    async fn put(
        &self,
        record: &ConversationRecord,
        expected_version: Option<i64>,
    ) -> DbResult<ConversationRecord> {
        let mut records = self.records.lock().unwrap();
        let current = records.get(&record.thread_id).map(|r| r.version);
        if current != expected_version {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
            return Err(DbError::VersionConflict {
                thread_id: record.thread_id.clone(),
                expected: expected_version,
                actual: current,
            });
        }

        let stored = ConversationRecord {
            version: current.unwrap_or(0) + 1,
            updated_at: Utc::now(),
            ..record.clone()
        };
        records.insert(record.thread_id.clone(), stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }
}

// ============================================================================
// Conflict-Injecting Store
// ============================================================================

/// Wraps a store and rejects the next `n` writes with a version conflict,
/// as if another writer had slipped in between read and write.
pub struct ConflictingStore<S> {
    inner: S,
    remaining: AtomicU32,
    /// Number of writes rejected so far
    pub injected: AtomicU32,
}

impl<S: ConversationStore> ConflictingStore<S> {
    pub fn new(inner: S, conflicts: u32) -> Self {
        Self {
            inner,
            remaining: AtomicU32::new(conflicts),
            injected: AtomicU32::new(0),
        }
    }

    /// A store on which every write conflicts
    pub fn always(inner: S) -> Self {
        Self::new(inner, u32::MAX)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn injected_count(&self) -> u32 {
        self.injected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: ConversationStore> ConversationStore for ConflictingStore<S> {
    async fn get(&self, thread_id: &str) -> DbResult<ConversationRecord> {
        self.inner.get(thread_id).await
    }

    async fn put(
        &self,
        record: &ConversationRecord,
        expected_version: Option<i64>,
    ) -> DbResult<ConversationRecord> {
        let inject = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if inject {
            self.injected.fetch_add(1, Ordering::SeqCst);
            return Err(DbError::VersionConflict {
                thread_id: record.thread_id.clone(),
                expected: expected_version,
                actual: expected_version.map(|v| v + 1),
            });
        }
        self.inner.put(record, expected_version).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::ConvState;

    #[tokio::test]
    async fn test_in_memory_store_conditional_writes() {
        let store = InMemoryStore::new();
        let fresh = store.create_default("t");
        assert_eq!(fresh.version, 0);
        assert!(store.get("t").await.is_err());

        let stored = store.put(&fresh, None).await.unwrap();
        assert_eq!(stored.version, 1);

        let err = store.put(&fresh, None).await.unwrap_err();
        assert!(matches!(err, DbError::VersionConflict { .. }));

        let next = ConversationRecord {
            state: ConvState::AwaitingName,
            ..stored
        };
        assert_eq!(store.put(&next, Some(1)).await.unwrap().version, 2);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.conflict_count(), 1);
    }

    #[tokio::test]
    async fn test_conflicting_store_injects_then_delegates() {
        let store = ConflictingStore::new(InMemoryStore::new(), 2);
        let record = store.create_default("t");

        assert!(store.put(&record, None).await.is_err());
        assert!(store.put(&record, None).await.is_err());
        assert!(store.put(&record, None).await.is_ok());
        assert_eq!(store.injected_count(), 2);
        assert_eq!(store.inner().write_count(), 1);
    }
}
