//! Pure state transition function
//!
//! Every (state, intent) pair has a defined outcome. Out-of-order or
//! unrecognised input re-prompts for the expected next step instead of
//! failing, and terminal states absorb everything.

use super::{ConvState, Intent, Reply};

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    /// Name captured by this transition, if any
    pub captured_name: Option<String>,
    pub reply: Reply,
}

impl TransitionResult {
    pub fn new(state: ConvState, reply: Reply) -> Self {
        Self {
            new_state: state,
            captured_name: None,
            reply,
        }
    }

    pub fn with_captured_name(mut self, name: impl Into<String>) -> Self {
        self.captured_name = Some(name.into());
        self
    }
}

/// Pure transition function
///
/// Given the same inputs it always produces the same output, with no I/O.
pub fn transition(state: ConvState, intent: Intent) -> TransitionResult {
    match (state, intent) {
        (ConvState::New, Intent::Greet) => {
            TransitionResult::new(ConvState::AwaitingName, Reply::AskName)
        }
        (ConvState::New, _) => TransitionResult::new(ConvState::New, Reply::PromptGreeting),

        (ConvState::AwaitingName, Intent::NameText(name)) => TransitionResult::new(
            ConvState::AwaitingAction,
            Reply::AskAction { name: name.clone() },
        )
        .with_captured_name(name),
        (ConvState::AwaitingName, _) => {
            TransitionResult::new(ConvState::AwaitingName, Reply::PromptName)
        }

        (ConvState::AwaitingAction, Intent::RequestForward) => {
            TransitionResult::new(ConvState::Forwarded, Reply::Forwarded)
        }
        (ConvState::AwaitingAction, Intent::Depart) => {
            TransitionResult::new(ConvState::Left, Reply::Departed)
        }
        (ConvState::AwaitingAction, _) => {
            TransitionResult::new(ConvState::AwaitingAction, Reply::PromptAction)
        }

        (ConvState::Forwarded, _) => {
            TransitionResult::new(ConvState::Forwarded, Reply::AlreadyForwarded)
        }
        (ConvState::Left, _) => TransitionResult::new(ConvState::Left, Reply::AlreadyLeft),
    }
}
