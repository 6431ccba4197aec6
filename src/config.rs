//! Configuration for kvstash
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{KvError, Result};

/// Main configuration for a Store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Backing File
    // -------------------------------------------------------------------------
    /// Path of the backing file. Parent directories must already exist.
    pub path: PathBuf,

    /// Permission bits for a newly created backing file (Unix only)
    pub file_mode: u32,

    /// Name of the container (table) every entry lives in
    pub container: String,

    // -------------------------------------------------------------------------
    // Locking
    // -------------------------------------------------------------------------
    /// How long open waits for the exclusive file lock.
    /// `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,

    /// Retry cadence while another handle holds the lock
    pub lock_poll_interval: Duration,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Max key length (in bytes)
    pub max_key_size: usize,

    /// Max encoded value length (in bytes)
    pub max_value_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./kvstash.db"),
            file_mode: 0o640,
            container: Self::DEFAULT_CONTAINER.to_string(),
            lock_timeout: Some(Duration::from_millis(50)),
            lock_poll_interval: Duration::from_millis(10),
            max_key_size: 32 * 1024,       // 32 KB
            max_value_size: (1 << 31) - 2, // ~2 GB
        }
    }
}

impl Config {
    /// Container used when none is configured
    pub const DEFAULT_CONTAINER: &'static str = "kvs";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.container.is_empty() {
            return Err(KvError::Config("container name must not be empty".into()));
        }
        if self.lock_poll_interval.is_zero() {
            return Err(KvError::Config("lock poll interval must be non-zero".into()));
        }
        if self.max_key_size == 0 {
            return Err(KvError::Config("max key size must be non-zero".into()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the permission bits for a new backing file
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    /// Set the container name
    pub fn container(mut self, name: impl Into<String>) -> Self {
        self.config.container = name.into();
        self
    }

    /// Set the lock acquisition timeout (`None` waits forever)
    pub fn lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.lock_timeout = timeout;
        self
    }

    /// Set the lock retry interval
    pub fn lock_poll_interval(mut self, interval: Duration) -> Self {
        self.config.lock_poll_interval = interval;
        self
    }

    /// Set the max key length (in bytes)
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the max encoded value length (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
