//! Replies produced by state transitions

use serde::Serialize;

/// What the bot says back after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    AskName,
    PromptGreeting,
    PromptName,
    AskAction { name: String },
    PromptAction,
    Forwarded,
    Departed,
    AlreadyForwarded,
    AlreadyLeft,
}

impl Reply {
    /// Human-readable text for the reply
    pub fn text(&self) -> String {
        match self {
            Reply::AskName => "Hi there! What's your name?".to_string(),
            Reply::PromptGreeting => "Say 'hi' to begin.".to_string(),
            Reply::PromptName => "Please tell me your name.".to_string(),
            Reply::AskAction { name } => {
                format!("Nice to meet you, {name}! Reply 'forward' or 'left'.")
            }
            Reply::PromptAction => "Please reply with 'forward' or 'left'.".to_string(),
            Reply::Forwarded => "Your conversation has been forwarded.".to_string(),
            Reply::Departed => "You chose to leave. Goodbye!".to_string(),
            Reply::AlreadyForwarded => "This conversation was already forwarded.".to_string(),
            Reply::AlreadyLeft => "You already left this conversation.".to_string(),
        }
    }
}
