// flintbase-core/src/lib.rs
// Pure Rust API - no bindings, no async runtime

pub mod error;
pub mod kv;
pub mod data_log;
pub mod collection;
pub mod query;
pub mod registry;
pub mod transaction;
pub mod engine;

// Public exports
pub use error::{FlintError, Result};
pub use kv::KeyValueStore;
pub use data_log::DataLog;
pub use collection::DocumentStore;
pub use registry::{IndexRegistry, SchemaRegistry};
pub use transaction::{TransactionManager, TransactionSnapshot, TransactionState};
pub use engine::StorageEngine;
