// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlintError {
    #[error("Key '{0}' not found")]
    KeyNotFound(String),

    #[error("Transaction already in progress")]
    TransactionActive,

    #[error("No active transaction")]
    NoActiveTransaction,

    #[error("Backing store error: {0}")]
    BackingStore(#[from] std::io::Error),

    #[error("Invalid key '{0}': keys may not contain ':'")]
    InvalidKey(String),

    #[error("Document parse error: {0}")]
    DocumentParse(String),
}

pub type Result<T> = std::result::Result<T, FlintError>;
