//! In-memory session store implementation.

use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::{Session, SessionStore};

/// An in-memory session store backed by a mutex-protected hash map.
///
/// Never persisted; a restart begins with every sender absent.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, sender_id: &str) -> Option<Session> {
        self.sessions.lock().get(sender_id).cloned()
    }

    fn set(&self, sender_id: &str, session: Session) {
        self.sessions.lock().insert(sender_id.to_string(), session);
    }

    fn clear(&self) -> usize {
        self.sessions.lock().drain().count()
    }

    fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
