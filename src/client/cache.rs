//! In-memory cache of detail lookups.
//!
//! Owned by whoever performs the lookups and dropped with it; nothing is
//! shared between invocations or persisted.

use std::collections::HashMap;

use serde_json::Value;

#[derive(Debug, Default)]
pub struct DetailCache {
    entries: HashMap<String, Value>,
}

impl DetailCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a user query: trimmed and lowercased.
    #[must_use]
    pub fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
