// src/engine.rs
// Public facade: routes reads and writes through the transaction manager,
// mirrors the most recent failure into a last-error slot

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collection::DocumentStore;
use crate::data_log::DataLog;
use crate::error::{FlintError, Result};
use crate::kv::KeyValueStore;
use crate::query;
use crate::registry::{IndexRegistry, SchemaRegistry};
use crate::transaction::{TransactionManager, TransactionState};

/// Embedded storage engine over a flat key/value map and schema-less
/// document collections, with single-writer transactions.
///
/// Every public operation returns a `Result`; that result is the primary
/// error channel. As a convenience the most recent failure message is also
/// mirrored into a single slot retrievable via [`last_error`], overwritten
/// by every subsequent failing call and never cleared automatically.
///
/// The engine assumes one logical caller at a time. In a multi-threaded
/// program wrap the whole engine in one lock covering every operation.
///
/// [`last_error`]: StorageEngine::last_error
pub struct StorageEngine {
    path: PathBuf,
    kv: KeyValueStore,
    docs: DocumentStore,
    schemas: SchemaRegistry,
    indexes: IndexRegistry,
    tx: TransactionManager,
    log: Option<DataLog>,
    last_error: Option<String>,
}

impl StorageEngine {
    /// Create an engine for the given backing-file path.
    ///
    /// No file I/O happens until [`create_database`] is called; until then
    /// the engine runs purely in memory.
    ///
    /// [`create_database`]: StorageEngine::create_database
    pub fn new(path: impl AsRef<Path>) -> Self {
        debug!(path = %path.as_ref().display(), "initializing storage engine");
        StorageEngine {
            path: path.as_ref().to_path_buf(),
            kv: KeyValueStore::new(),
            docs: DocumentStore::new(),
            schemas: SchemaRegistry::new(),
            indexes: IndexRegistry::new(),
            tx: TransactionManager::new(),
            log: None,
            last_error: None,
        }
    }

    /// Record a failure in the last-error slot and hand the error back
    fn fail(&mut self, err: FlintError) -> FlintError {
        self.last_error = Some(err.to_string());
        err
    }

    // ========== Database operations ==========

    /// Create or open the backing file and attach it.
    ///
    /// If the file already holds records they are loaded last-write-wins
    /// into the in-memory store: the file is the authoritative committed
    /// state, the in-memory map a cache in front of it.
    pub fn create_database(&mut self) -> Result<()> {
        let mut log = DataLog::open(&self.path).map_err(|e| self.fail(e))?;
        let entries = match log.load() {
            Ok(entries) => entries,
            Err(e) => return Err(self.fail(e)),
        };

        self.kv.replace(entries);
        self.log = Some(log);
        Ok(())
    }

    /// Remove the backing file and clear all in-memory state, including
    /// any in-flight transaction
    pub fn delete_database(&mut self) -> Result<()> {
        match self.log.take() {
            Some(log) => log.delete().map_err(|e| self.fail(e))?,
            None if self.path.exists() => {
                std::fs::remove_file(&self.path).map_err(|e| self.fail(e.into()))?
            }
            None => {}
        }

        self.kv.clear();
        self.docs.clear();
        self.schemas.clear();
        self.indexes.clear();
        self.tx = TransactionManager::new();
        Ok(())
    }

    // ========== Key/value operations ==========

    /// Write a key/value pair: buffered in the transaction overlay while
    /// one is active, applied to committed state (and appended to the
    /// backing file) otherwise.
    pub fn write_data(&mut self, key: &str, value: &str) -> Result<()> {
        // The log format cannot represent such keys; reject before any
        // state changes so the overlay and the file never disagree
        if self.log.is_some() && key.contains(':') {
            return Err(self.fail(FlintError::InvalidKey(key.to_string())));
        }

        if !self.tx.is_active() {
            let persisted = match self.log.as_mut() {
                Some(log) => log.append(key, value),
                None => Ok(()),
            };
            persisted.map_err(|e| self.fail(e))?;
        }

        self.tx.write(&mut self.kv, key, value);
        Ok(())
    }

    /// Read a key: the transaction overlay wins over committed state while
    /// a transaction is active
    pub fn read_data(&mut self, key: &str) -> Result<String> {
        match self.tx.read(&self.kv, key) {
            Some(value) => Ok(value.to_string()),
            None => Err(self.fail(FlintError::KeyNotFound(key.to_string()))),
        }
    }

    // ========== Document operations ==========

    /// Append a document blob to a collection.
    ///
    /// Document writes go straight to committed state even while a
    /// transaction is active; they are not buffered and rollback does not
    /// undo them.
    pub fn write_document(&mut self, collection: &str, blob: &str) -> Result<()> {
        self.docs.append(collection, blob);
        Ok(())
    }

    /// Return the blobs in a collection matching every filter entry.
    ///
    /// Each blob is parsed as JSON; a blob that fails to parse is skipped
    /// and the parse error recorded in the last-error slot, without
    /// failing the query. An absent collection yields an empty result.
    /// Matching blobs are returned byte-identical to what was written.
    pub fn query_documents(
        &mut self,
        collection: &str,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<String>> {
        let mut results = Vec::new();
        let mut parse_error = None;

        for blob in self.docs.scan(collection) {
            match serde_json::from_str::<serde_json::Value>(blob) {
                Ok(doc) => {
                    if query::matches(&doc, filters) {
                        results.push(blob.to_string());
                    }
                }
                Err(e) => {
                    parse_error = Some(FlintError::DocumentParse(e.to_string()).to_string());
                }
            }
        }

        if let Some(msg) = parse_error {
            self.last_error = Some(msg);
        }
        Ok(results)
    }

    /// Collection names in sorted order
    pub fn list_collections(&self) -> Vec<String> {
        self.docs.collection_names()
    }

    // ========== Schema management ==========

    /// Register a schema definition. The definition is stored opaquely;
    /// nothing is validated against stored documents.
    pub fn create_schema(&mut self, definition: &str) -> Result<()> {
        self.schemas.register(definition);
        Ok(())
    }

    /// Register a new version of the schema definition
    pub fn update_schema(&mut self, definition: &str) -> Result<()> {
        self.schemas.register(definition);
        Ok(())
    }

    // ========== Indexing ==========

    /// Register an index name. Bookkeeping only: no effect on query
    /// execution or performance.
    pub fn create_index(&mut self, field_name: &str) -> Result<()> {
        self.indexes.create(field_name);
        Ok(())
    }

    /// Remove an index name; dropping an unknown name is not an error
    pub fn drop_index(&mut self, field_name: &str) -> Result<()> {
        self.indexes.remove(field_name);
        Ok(())
    }

    // ========== Transactions ==========

    /// Begin a transaction, snapshotting committed state
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.tx
            .begin(&self.kv, &self.docs)
            .map_err(|e| self.fail(e))
    }

    /// Apply the transaction's buffered writes to committed state.
    ///
    /// Each key whose value differs from the snapshot base (including new
    /// keys) is appended to the backing file.
    pub fn commit_transaction(&mut self) -> Result<()> {
        let snap = self.tx.commit(&mut self.kv).map_err(|e| self.fail(e))?;

        let persisted = match self.log.as_mut() {
            Some(log) => {
                let mut result = Ok(());
                for (key, value) in snap.overlay_kv() {
                    if snap.base_kv().get(key) != Some(value) {
                        if let Err(e) = log.append(key, value) {
                            result = Err(e);
                            break;
                        }
                    }
                }
                result
            }
            None => Ok(()),
        };
        persisted.map_err(|e| self.fail(e))
    }

    /// Discard the transaction's buffered writes.
    ///
    /// Committed state is left exactly as it was at begin; the backing
    /// file is truncated and rewritten to contain only the
    /// pre-transaction key/value pairs.
    pub fn rollback_transaction(&mut self) -> Result<()> {
        let snap = self.tx.rollback(&mut self.kv).map_err(|e| self.fail(e))?;

        let persisted = match self.log.as_mut() {
            Some(log) => log.rewrite(snap.base_kv()),
            None => Ok(()),
        };
        persisted.map_err(|e| self.fail(e))
    }

    /// Current transaction state
    pub fn transaction_state(&self) -> TransactionState {
        self.tx.state()
    }

    // ========== Observability ==========

    /// Most recent failure message, if any call has failed.
    ///
    /// Single-slot: overwritten by every subsequent failing call, never
    /// cleared automatically. Each call's own `Result` is the primary
    /// error channel; this exists for callers that want the last message
    /// after the fact.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Engine statistics as JSON
    pub fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "path": self.path.display().to_string(),
            "file_attached": self.log.is_some(),
            "key_count": self.kv.len(),
            "collections": self.docs.collection_names().iter().map(|name| {
                serde_json::json!({
                    "name": name,
                    "document_count": self.docs.len(name),
                })
            }).collect::<Vec<_>>(),
            "schema_versions": self.schemas.version_count(),
            "indexes": self.indexes.names(),
            "in_transaction": self.tx.is_active(),
        })
    }

    /// Backing-file path this engine was created with
    pub fn path(&self) -> &Path {
        &self.path
    }
}
