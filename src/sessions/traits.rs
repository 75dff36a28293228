//! Session storage traits and types for per-user dialogue state.

use serde::{Deserialize, Serialize};

use crate::dialogue::Status;

/// A user's conversational progress through the menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub sender_id: String,
    pub status: Status,
    /// Free-text answers captured so far in the current sub-flow.
    pub answers: Vec<String>,
}

impl Session {
    pub fn new(sender_id: impl Into<String>, status: Status) -> Self {
        Self {
            sender_id: sender_id.into(),
            status,
            answers: Vec::new(),
        }
    }
}

/// Process-wide mapping from sender id to session.
///
/// All operations are total. Absence of a session is meaningful: the sender
/// has not interacted since the last reset.
pub trait SessionStore: Send + Sync {
    /// Get the session for a sender, if one exists.
    fn get(&self, sender_id: &str) -> Option<Session>;

    /// Insert or overwrite the session for a sender.
    fn set(&self, sender_id: &str, session: Session);

    /// Remove every session. Returns how many were removed.
    fn clear(&self) -> usize;

    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The name of this session store implementation.
    fn name(&self) -> &str;
}
