// src/kv.rs
// Committed key/value mapping - leaf state, no transaction awareness

use std::collections::BTreeMap;

/// Committed key -> value mapping.
///
/// A `BTreeMap` keeps iteration deterministic, which the stats report and
/// the tests rely on. The store itself knows nothing about transactions;
/// the `TransactionManager` snapshots and replaces it wholesale.
#[derive(Debug, Default, Clone)]
pub struct KeyValueStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        KeyValueStore {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a key
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Immutable copy of the committed mapping, taken at transaction begin
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    /// Replace the committed mapping wholesale (commit / rollback path)
    pub fn replace(&mut self, entries: BTreeMap<String, String>) {
        self.entries = entries;
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate committed entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
