//! Core conversation state machine
//!
//! Classification and transitions are pure; the runtime owns all I/O.

pub mod event;
pub mod intent;
mod reply;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use event::Event;
pub use intent::{Classifier, Intent};
pub use reply::Reply;
pub use state::ConvState;
pub use transition::transition;
