// src/collection.rs
// Committed document collections - leaf state, no transaction awareness

use std::collections::BTreeMap;

/// Named collections of opaque document blobs.
///
/// Blobs are conventionally JSON text but the store never inspects them;
/// parsing happens only in the query path. Insertion order is preserved
/// within a collection and documents are immutable once appended - this
/// core has no update or delete operation on documents.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    collections: BTreeMap<String, Vec<String>>,
}

impl DocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        DocumentStore {
            collections: BTreeMap::new(),
        }
    }

    /// Append a blob to the end of the named collection, creating it if absent
    pub fn append(&mut self, collection: &str, blob: impl Into<String>) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(blob.into());
    }

    /// Iterate a collection's blobs in insertion order.
    ///
    /// An absent collection yields an empty iterator, not an error.
    pub fn scan<'a>(&'a self, collection: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(String::as_str)
    }

    /// Immutable copy of all collections, taken at transaction begin
    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.collections.clone()
    }

    /// Drop every collection
    pub fn clear(&mut self) {
        self.collections.clear();
    }

    /// Collection names in sorted order
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Number of documents in a collection (0 if absent)
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
