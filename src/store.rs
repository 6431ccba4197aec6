//! Store Module
//!
//! The typed facade over the embedded engine.
//!
//! ## Responsibilities
//! - Open the backing file and hold its exclusive lock
//! - Keep the container (table) every entry lives in
//! - Map each operation to exactly one engine transaction
//! - Reject misuse (absent values, empty keys, use after close)

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use redb::{Builder, Database, DatabaseError, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec;
use crate::config::Config;
use crate::error::{KvError, Result};

/// Table layout: string keys, encoded values
type Container<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

/// A typed key-value store backed by a single file
///
/// ## Transaction Model
///
/// - **Writes** (put/delete): one read-write transaction each. The engine
///   runs at most one at a time; a transaction dropped before `commit`
///   rolls back, so every early return leaves the file untouched.
///
/// - **Reads** (get/len/keys): one read-only transaction each, served from
///   a snapshot. Readers never wait on the writer.
///
/// ## Lifecycle
///
/// A `Store` only exists after a successful open. `close` takes the handle
/// out of `db`; from then on every operation fails with `KvError::Closed`.
/// Operations hold the read side of `db`, so `close` waits for in-flight
/// calls to finish before releasing the file lock.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Engine handle, `None` once closed
    db: RwLock<Option<Database>>,
}

impl Store {
    /// Open or create a store at `path`
    ///
    /// Waits up to `lock_timeout` for another handle to release the file
    /// (`None` waits indefinitely). The parent directory must exist.
    pub fn open(path: impl AsRef<Path>, lock_timeout: Option<Duration>) -> Result<Self> {
        let config = Config::builder()
            .path(path.as_ref())
            .lock_timeout(lock_timeout)
            .build();
        Self::open_with(config)
    }

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Open/create the backing file
    /// 2. Take the exclusive lock (bounded wait)
    /// 3. Create the container if it is missing
    pub fn open_with(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Self::acquire(&config)?;
        Self::ensure_container(&db, &config.container)?;

        tracing::info!(
            "Opened store {} (container {:?})",
            config.path.display(),
            config.container
        );

        Ok(Self {
            config,
            db: RwLock::new(Some(db)),
        })
    }

    /// Put a value under `key`, replacing any previous one
    ///
    /// Absent values (`None`, `()`) fail with `BadValue` and empty keys with
    /// `KeyRequired`, both before the engine is touched.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.check_key(key)?;

        let bytes = codec::encode(value)?;
        if bytes.len() > self.config.max_value_size {
            return Err(KvError::ValueTooLarge {
                size: bytes.len(),
                max: self.config.max_value_size,
            });
        }

        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KvError::Closed)?;

        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(self.container())?;
            table.insert(key, bytes.as_slice())?;
        }
        txn.commit()?;

        tracing::debug!("put {:?} ({} bytes)", key, bytes.len());
        Ok(())
    }

    /// Get the value stored under `key`
    ///
    /// Fails with `NotFound` if the key is absent. Decode failures come back
    /// as `KvError::Encoding` untouched.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KvError::Closed)?;

        let txn = db.begin_read()?;
        let table = txn.open_table(self.container())?;

        let value = match table.get(key)? {
            Some(bytes) => {
                tracing::trace!("get {:?} ({} bytes)", key, bytes.value().len());
                codec::decode(bytes.value())?
            }
            None => return Err(KvError::NotFound),
        };

        tracing::debug!("get {:?}", key);
        Ok(value)
    }

    /// Get with an optional destination
    ///
    /// With `None` this is an existence check: `Ok(())` if the key is
    /// present, `NotFound` otherwise. With `Some(dest)` the stored value is
    /// decoded into `dest`.
    pub fn get_into<T: DeserializeOwned>(&self, key: &str, dest: Option<&mut T>) -> Result<()> {
        match dest {
            Some(dest) => {
                *dest = self.get(key)?;
                Ok(())
            }
            None => {
                if self.exists(key)? {
                    Ok(())
                } else {
                    Err(KvError::NotFound)
                }
            }
        }
    }

    /// Whether `key` has an entry
    pub fn exists(&self, key: &str) -> Result<bool> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KvError::Closed)?;

        let txn = db.begin_read()?;
        let table = txn.open_table(self.container())?;
        let found = table.get(key)?.is_some();
        Ok(found)
    }

    /// Delete the entry for `key`
    ///
    /// Fails with `NotFound` if the key is absent, like `get`.
    pub fn delete(&self, key: &str) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KvError::Closed)?;

        let txn = db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(self.container())?;
            // Bind first: the access guard must drop before the table
            let removed = table.remove(key)?.is_some();
            removed
        };

        if !removed {
            txn.abort()?;
            return Err(KvError::NotFound);
        }

        txn.commit()?;

        tracing::debug!("delete {:?}", key);
        Ok(())
    }

    /// Number of entries in the container
    pub fn len(&self) -> Result<u64> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KvError::Closed)?;

        let txn = db.begin_read()?;
        let table = txn.open_table(self.container())?;
        let len = table.len()?;
        Ok(len)
    }

    /// Whether the container has no entries
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// All keys, in sorted order
    pub fn keys(&self) -> Result<Vec<String>> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(KvError::Closed)?;

        let txn = db.begin_read()?;
        let table = txn.open_table(self.container())?;

        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    /// Close the store and release the file lock
    ///
    /// Fails with `Closed` if the store was already closed.
    pub fn close(&self) -> Result<()> {
        let db = self.db.write().take().ok_or(KvError::Closed)?;
        drop(db);

        tracing::info!("Closed store {}", self.config.path.display());
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether the store is still open
    pub fn is_open(&self) -> bool {
        self.db.read().is_some()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn container(&self) -> Container<'_> {
        TableDefinition::new(&self.config.container)
    }

    fn check_key(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::KeyRequired);
        }
        if key.len() > self.config.max_key_size {
            return Err(KvError::KeyTooLarge {
                size: key.len(),
                max: self.config.max_key_size,
            });
        }
        Ok(())
    }

    /// Open the engine, retrying while another handle holds the file lock
    fn acquire(config: &Config) -> Result<Database> {
        let started = Instant::now();
        let mut contended = false;

        loop {
            let file = Self::open_file(config)?;

            match Builder::new().create_file(file) {
                Ok(db) => return Ok(db),
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    let elapsed = started.elapsed();
                    let pause = match config.lock_timeout {
                        Some(timeout) if elapsed >= timeout => {
                            tracing::warn!(
                                "Gave up on lock for {} after {:?}",
                                config.path.display(),
                                elapsed
                            );
                            return Err(KvError::Locked {
                                path: config.path.clone(),
                                timeout: config.lock_timeout,
                            });
                        }
                        Some(timeout) => config.lock_poll_interval.min(timeout - elapsed),
                        None => config.lock_poll_interval,
                    };

                    if !contended {
                        tracing::warn!("{} is locked, waiting", config.path.display());
                        contended = true;
                    }
                    thread::sleep(pause);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn open_file(config: &Config) -> Result<File> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(config.file_mode);
        }

        Ok(options.open(&config.path)?)
    }

    fn ensure_container(db: &Database, name: &str) -> Result<()> {
        let def: Container<'_> = TableDefinition::new(name);

        let txn = db.begin_write()?;
        txn.open_table(def)?;
        txn.commit()?;
        Ok(())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.config.path)
            .field("container", &self.config.container)
            .field("open", &self.is_open())
            .finish()
    }
}
