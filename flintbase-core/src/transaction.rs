// src/transaction.rs
// Single-writer transaction state machine over the two store leaves

use std::collections::BTreeMap;

use tracing::debug;

use crate::collection::DocumentStore;
use crate::error::{FlintError, Result};
use crate::kv::KeyValueStore;

/// Engine transaction state; exactly one of the two at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction in progress; mutations apply directly
    Idle,
    /// A transaction is buffering key/value writes
    InTransaction,
}

/// State captured at `begin`, alive for exactly one transaction.
///
/// The snapshot owns an immutable copy of the committed key/value mapping
/// (`base_kv`), a mutable overlay seeded from it that receives every write
/// issued during the transaction, and an immutable copy of the committed
/// document collections. The overlay is always a superset of the base: it
/// starts as an exact copy and entries are only ever overwritten or added,
/// never removed.
#[derive(Debug, Clone)]
pub struct TransactionSnapshot {
    base_kv: BTreeMap<String, String>,
    overlay_kv: BTreeMap<String, String>,
    base_docs: BTreeMap<String, Vec<String>>,
}

impl TransactionSnapshot {
    fn capture(kv: &KeyValueStore, docs: &DocumentStore) -> Self {
        let base_kv = kv.snapshot();
        TransactionSnapshot {
            overlay_kv: base_kv.clone(),
            base_kv,
            base_docs: docs.snapshot(),
        }
    }

    /// Committed key/value mapping as of transaction start
    pub fn base_kv(&self) -> &BTreeMap<String, String> {
        &self.base_kv
    }

    /// The base plus every write issued during the transaction
    pub fn overlay_kv(&self) -> &BTreeMap<String, String> {
        &self.overlay_kv
    }

    /// Committed document collections as of transaction start
    pub fn base_documents(&self) -> &BTreeMap<String, Vec<String>> {
        &self.base_docs
    }
}

/// Orchestrates snapshot capture, buffered writes and commit/rollback.
///
/// The owned `Option<TransactionSnapshot>` is the whole state machine:
/// `Some` while `InTransaction`, `None` while `Idle`. `begin` constructs
/// the snapshot, `commit`/`rollback` consume it by value, so no snapshot
/// can outlive its transaction and at most one exists at a time. The
/// store leaves are passed in by the facade, which owns them.
#[derive(Debug, Default)]
pub struct TransactionManager {
    snapshot: Option<TransactionSnapshot>,
}

impl TransactionManager {
    pub fn new() -> Self {
        TransactionManager { snapshot: None }
    }

    pub fn state(&self) -> TransactionState {
        if self.snapshot.is_some() {
            TransactionState::InTransaction
        } else {
            TransactionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The live snapshot, if a transaction is in progress
    pub fn snapshot(&self) -> Option<&TransactionSnapshot> {
        self.snapshot.as_ref()
    }

    /// Start a transaction, capturing the committed state of both leaves.
    ///
    /// Fails with `TransactionActive` if one is already in progress; the
    /// running transaction's buffered state is untouched.
    pub fn begin(&mut self, kv: &KeyValueStore, docs: &DocumentStore) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(FlintError::TransactionActive);
        }

        self.snapshot = Some(TransactionSnapshot::capture(kv, docs));
        debug!("transaction started");
        Ok(())
    }

    /// Write a key/value pair: into the overlay while a transaction is
    /// active, directly into the committed store otherwise. A key written
    /// several times in one transaction keeps only the last value.
    pub fn write(&mut self, kv: &mut KeyValueStore, key: &str, value: &str) {
        match self.snapshot.as_mut() {
            Some(snap) => {
                snap.overlay_kv.insert(key.to_string(), value.to_string());
            }
            None => kv.put(key, value),
        }
    }

    /// Read a key: overlay first, then base, while a transaction is
    /// active; the committed store otherwise.
    ///
    /// The overlay always wins over the base, even when the values are
    /// equal - the fallback is only taken for keys absent from the
    /// overlay, which (the overlay being a superset of the base) can only
    /// happen for keys absent from both.
    pub fn read<'a>(&'a self, kv: &'a KeyValueStore, key: &str) -> Option<&'a str> {
        match self.snapshot.as_ref() {
            Some(snap) => snap
                .overlay_kv
                .get(key)
                .or_else(|| snap.base_kv.get(key))
                .map(String::as_str),
            None => kv.get(key),
        }
    }

    /// Atomically replace the committed mapping with the overlay.
    ///
    /// Consumes the snapshot and returns it so the caller can diff base
    /// against overlay when persisting. Fails with `NoActiveTransaction`
    /// when idle; committed state unchanged.
    pub fn commit(&mut self, kv: &mut KeyValueStore) -> Result<TransactionSnapshot> {
        let snap = self.snapshot.take().ok_or(FlintError::NoActiveTransaction)?;

        kv.replace(snap.overlay_kv.clone());
        debug!(keys = snap.overlay_kv.len(), "transaction committed");
        Ok(snap)
    }

    /// Discard the overlay, leaving the committed mapping exactly as it
    /// was at `begin`.
    ///
    /// Consumes the snapshot and returns it so the caller can rewrite any
    /// persistent log to the base set. Fails with `NoActiveTransaction`
    /// when idle; committed state unchanged.
    pub fn rollback(&mut self, kv: &mut KeyValueStore) -> Result<TransactionSnapshot> {
        let snap = self.snapshot.take().ok_or(FlintError::NoActiveTransaction)?;

        kv.replace(snap.base_kv.clone());
        debug!("transaction rolled back");
        Ok(snap)
    }
}
