//! # kvstash
//!
//! A typed key-value store over an embedded, crash-consistent engine:
//! - String keys, any `serde` value (bincode on disk)
//! - One engine transaction per operation (commit or roll back, never half)
//! - Single writer, snapshot readers
//! - Exclusive file lock with a bounded wait on open
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Store (typed facade)                      │
//! │          open / put / get / delete / close                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │   Engine    │
//!   │  (bincode)  │          │   (redb)    │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Backing file│
//!                           │ (container) │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kvstash::Store;
//!
//! let store = Store::open("test.db", Some(Duration::from_millis(50)))?;
//! store.put("a", "hello")?;
//! let value: String = store.get("a")?;
//! assert_eq!(value, "hello");
//! store.delete("a")?;
//! assert!(store.get::<String>("a").unwrap_err().is_not_found());
//! store.close()?;
//! # Ok::<(), kvstash::KvError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvstash
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
