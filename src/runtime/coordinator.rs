//! Conversation coordinator
//!
//! Applies one inbound event at a time per thread: load, classify,
//! transition, persist, reply.

use super::locks::ThreadLocks;
use super::traits::ConversationStore;
use crate::db::{ConversationRecord, DbError};
use crate::state_machine::{transition, Classifier, ConvState, Event, Reply};
use thiserror::Error;

/// Writes attempted per event before giving up on version conflicts
const MAX_PUT_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Gave up on thread {thread_id} after {attempts} conflicting writes")]
    RetryExhausted { thread_id: String, attempts: u32 },
    #[error(transparent)]
    Store(#[from] DbError),
}

/// What handling one event produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub thread_id: String,
    pub state: ConvState,
    pub captured_name: Option<String>,
    pub reply: Reply,
    /// Whether the event changed (and persisted) the record
    pub changed: bool,
    pub version: i64,
}

impl Outcome {
    fn new(record: ConversationRecord, reply: Reply, changed: bool) -> Self {
        Self {
            thread_id: record.thread_id,
            state: record.state,
            captured_name: record.captured_name,
            reply,
            changed,
            version: record.version,
        }
    }

    pub fn reply_text(&self) -> String {
        self.reply.text()
    }
}

/// Drives the per-thread state machine against a durable store
pub struct Coordinator<S: ConversationStore> {
    store: S,
    classifier: Classifier,
    locks: ThreadLocks,
}

impl<S: ConversationStore> Coordinator<S> {
    pub fn new(store: S, classifier: Classifier) -> Self {
        Self {
            store,
            classifier,
            locks: ThreadLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one message for a thread
    pub async fn handle(&self, thread_id: &str, text: &str) -> Result<Outcome, CoordinatorError> {
        self.handle_event(Event::new(thread_id, text)).await
    }

    pub async fn handle_event(&self, event: Event) -> Result<Outcome, CoordinatorError> {
        let _guard = self.locks.acquire(&event.thread_id).await;

        for attempt in 1..=MAX_PUT_ATTEMPTS {
            let record = self.load(&event.thread_id).await?;
            let intent = self.classifier.classify(&event.text, record.state);

            tracing::debug!(
                thread_id = %event.thread_id,
                state = %record.state,
                intent = ?intent,
                attempt,
                "Applying event"
            );

            let result = transition(record.state, intent);
            let captured_name = result
                .captured_name
                .or_else(|| record.captured_name.clone());

            if result.new_state == record.state && captured_name == record.captured_name {
                return Ok(Outcome::new(record, result.reply, false));
            }

            let from = record.state;
            let expected_version = record.expected_version();
            let next = ConversationRecord {
                state: result.new_state,
                captured_name,
                ..record
            };

            match self.store.put(&next, expected_version).await {
                Ok(stored) => {
                    tracing::info!(
                        thread_id = %stored.thread_id,
                        %from,
                        state = %stored.state,
                        version = stored.version,
                        latency_ms = (chrono::Utc::now() - event.received_at).num_milliseconds(),
                        "Conversation advanced"
                    );
                    return Ok(Outcome::new(stored, result.reply, true));
                }
                Err(DbError::VersionConflict {
                    expected, actual, ..
                }) => {
                    tracing::warn!(
                        thread_id = %event.thread_id,
                        attempt,
                        ?expected,
                        ?actual,
                        "Version conflict, reloading"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(
            thread_id = %event.thread_id,
            attempts = MAX_PUT_ATTEMPTS,
            "Retry budget exhausted; record left unchanged"
        );
        Err(CoordinatorError::RetryExhausted {
            thread_id: event.thread_id,
            attempts: MAX_PUT_ATTEMPTS,
        })
    }

    /// Current stored record for a thread, if it has ever been written
    pub async fn status(&self, thread_id: &str) -> Result<Option<ConversationRecord>, CoordinatorError> {
        match self.store.get(thread_id).await {
            Ok(record) => Ok(Some(record)),
            Err(DbError::ConversationNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self, thread_id: &str) -> Result<ConversationRecord, CoordinatorError> {
        match self.store.get(thread_id).await {
            Ok(record) => Ok(record),
            Err(DbError::ConversationNotFound(_)) => Ok(self.store.create_default(thread_id)),
            Err(e) => Err(e.into()),
        }
    }
}
