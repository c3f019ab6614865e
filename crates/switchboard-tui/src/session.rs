//! In-memory session store shared between screens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use switchboard_core::SessionStore;

/// Cheap-to-clone handle; all clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStore for MemorySessionStore {
    fn set_item(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value);
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemorySessionStore::default();
        let other = store.clone();
        store.set_item("switchFilterFlag", "controller".into());
        assert_eq!(other.get_item("switchFilterFlag").as_deref(), Some("controller"));
        assert_eq!(other.get_item("missing"), None);
    }
}
