//! Intent classification for inbound text

use super::ConvState;

pub const DEFAULT_GREETING: &str = "hi";
const FORWARD_KEYWORD: &str = "forward";
const DEPART_KEYWORD: &str = "left";

/// Canonical meaning of one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greet,
    RequestForward,
    Depart,
    /// Free text offered as the user's name (trimmed, never empty)
    NameText(String),
    Unrecognized,
}

/// Maps raw message text to an [`Intent`].
///
/// Matching is case-insensitive on whitespace-trimmed text. Keywords win over
/// the free-text rule, so "left" is never taken as a name.
#[derive(Debug, Clone)]
pub struct Classifier {
    greetings: Vec<String>,
}

impl Classifier {
    /// Build a classifier recognising the given greeting tokens.
    ///
    /// Blank tokens are dropped; if nothing usable remains, "hi" is used.
    pub fn new<I, S>(greetings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens: Vec<String> = Vec::new();
        for token in greetings {
            let token = token.as_ref().trim().to_lowercase();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        if tokens.is_empty() {
            tokens.push(DEFAULT_GREETING.to_string());
        }
        Self { greetings: tokens }
    }

    pub fn greetings(&self) -> &[String] {
        &self.greetings
    }

    pub fn classify(&self, text: &str, state: ConvState) -> Intent {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();

        if self.greetings.iter().any(|g| *g == lowered) {
            return Intent::Greet;
        }
        match lowered.as_str() {
            FORWARD_KEYWORD => Intent::RequestForward,
            DEPART_KEYWORD => Intent::Depart,
            "" => Intent::Unrecognized,
            _ if state == ConvState::AwaitingName => Intent::NameText(trimmed.to_string()),
            _ => Intent::Unrecognized,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new([DEFAULT_GREETING])
    }
}
