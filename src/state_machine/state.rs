//! Conversation state types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a thread currently sits in the greeting workflow.
///
/// The progression is `New -> AwaitingName -> AwaitingAction`, then one of the
/// two terminal states. Terminal states only ever loop back onto themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConvState {
    #[default]
    New,
    AwaitingName,
    AwaitingAction,
    Forwarded,
    Left,
}

impl ConvState {
    pub const ALL: [ConvState; 5] = [
        ConvState::New,
        ConvState::AwaitingName,
        ConvState::AwaitingAction,
        ConvState::Forwarded,
        ConvState::Left,
    ];

    /// Stable name used for persistence and on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            ConvState::New => "NEW",
            ConvState::AwaitingName => "AWAITING_NAME",
            ConvState::AwaitingAction => "AWAITING_ACTION",
            ConvState::Forwarded => "FORWARDED",
            ConvState::Left => "LEFT",
        }
    }

    /// Check if no outbound transition exists from this state
    pub fn is_terminal(self) -> bool {
        matches!(self, ConvState::Forwarded | ConvState::Left)
    }

    /// Check if a name must already have been captured in this state
    pub fn has_captured_name(self) -> bool {
        matches!(
            self,
            ConvState::AwaitingAction | ConvState::Forwarded | ConvState::Left
        )
    }
}

impl fmt::Display for ConvState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a persisted state name is not one we know about
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown conversation state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for ConvState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConvState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}
