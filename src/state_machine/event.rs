//! Inbound events that drive a conversation

use chrono::{DateTime, Utc};

/// One inbound message for a thread. Never persisted.
#[derive(Debug, Clone)]
pub struct Event {
    pub thread_id: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Event {
    pub fn new(thread_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}
