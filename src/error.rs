//! Error types for kvstash
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvstash operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Facade Errors (detected before touching the engine)
    // -------------------------------------------------------------------------
    #[error("kvs: key not found")]
    NotFound,

    #[error("kvs: bad value")]
    BadValue,

    #[error("kvs: key required")]
    KeyRequired,

    #[error("kvs: key too large ({size} bytes, max {max})")]
    KeyTooLarge { size: usize, max: usize },

    #[error("kvs: value too large ({size} bytes, max {max})")]
    ValueTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("kvs: timed out waiting for lock on {path:?}")]
    Locked {
        path: PathBuf,
        timeout: Option<Duration>,
    },

    #[error("kvs: store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Encoding(#[from] bincode::Error),

    // -------------------------------------------------------------------------
    // I/O and Engine Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// True for the facade's `NotFound` sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::NotFound)
    }

    /// True when open gave up waiting for the file lock
    pub fn is_locked(&self) -> bool {
        matches!(self, KvError::Locked { .. })
    }
}

// Every redb error type funnels into `Storage` so `?` works inside transactions.
macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for KvError {
                fn from(err: $ty) -> Self {
                    KvError::Storage(redb::Error::from(err))
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
