//! Session management: tracks where each sender is in the dialogue.

pub mod in_memory;
pub mod traits;

use std::sync::Arc;

pub use in_memory::InMemorySessionStore;
pub use traits::{Session, SessionStore};

/// Create a default in-memory session store.
pub fn create_session_store() -> Arc<dyn SessionStore> {
    Arc::new(InMemorySessionStore::new())
}
