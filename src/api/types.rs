//! API request and response types

use crate::db::ConversationRecord;
use crate::runtime::Outcome;
use crate::state_machine::ConvState;
use serde::{Deserialize, Serialize};

/// Inbound chat message
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    /// Thread identifier
    pub thread_ts: String,
    #[allow(dead_code)] // Accepted for compatibility, not used by the workflow
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Whether the conversation still expects input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    AwaitingInput,
    Completed,
}

impl From<ConvState> for ConversationStatus {
    fn from(state: ConvState) -> Self {
        if state.is_terminal() {
            ConversationStatus::Completed
        } else {
            ConversationStatus::AwaitingInput
        }
    }
}

/// Response for a handled message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub state: ConvState,
    pub reply: String,
    pub thread_ts: String,
    pub status: ConversationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_name: Option<String>,
}

impl From<Outcome> for MessageResponse {
    fn from(outcome: Outcome) -> Self {
        Self {
            state: outcome.state,
            reply: outcome.reply_text(),
            status: outcome.state.into(),
            thread_ts: outcome.thread_id,
            captured_name: outcome.captured_name,
        }
    }
}

/// Response for a status lookup
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub conversation: ConversationRecord,
    pub status: ConversationStatus,
}

/// Response with all stored conversations
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationRecord>,
}

/// Service banner
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: Vec<&'static str>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
