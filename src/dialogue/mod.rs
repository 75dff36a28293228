//! Menu dialogue state machine
//!
//! A declarative transition table ([`transition::RULES`]) drives a pure
//! transition function; [`DialogueEngine`] applies it to the session store.

mod engine;
mod replies;
mod state;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use engine::{DialogueEngine, Outcome};
pub use replies::Reply;
pub use state::{normalize, Status};
pub use transition::{transition, Transition};
