//! Key-value storage backends.
//!
//! | Backend       | Persistence                        | Feature  |
//! |---------------|------------------------------------|----------|
//! | `MemoryStore` | process lifetime                   | none     |
//! | `DirStore`    | one file per key in a directory    | none     |
//! | `SqliteStore` | one row per key in `cache.db`      | `sqlite` |
//!
//! Stores move opaque bytes; the record format lives in
//! [`envelope`](crate::envelope).

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::CacheResult;

/// Byte storage keyed by string.
///
/// Implementations must be `Send + Sync`: one store is shared by every
/// request thread.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Insert or overwrite.
    fn put(&self, key: &str, value: &[u8]) -> CacheResult<()>;

    /// Remove `key`; absent keys are not an error.
    fn remove(&self, key: &str) -> CacheResult<()>;
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// ── DirStore ──────────────────────────────────────────────────────────────────

/// One file per key under a root directory.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new value,
/// never a partial one.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }
}

impl KvStore for DirStore {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Injective, filesystem-safe encoding of a key: ASCII alphanumerics, `-`
/// and `.` pass through, every other byte becomes `_xx` (lowercase hex).
pub fn file_stem(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || (b == b'.' && !out.is_empty()) {
            out.push(b as char);
        } else {
            out.push_str(&format!("_{b:02x}"));
        }
    }
    out
}

// ── SqliteStore ───────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::path::Path;
    use std::sync::{Mutex, PoisonError};

    use rusqlite::{Connection, OptionalExtension};

    use super::KvStore;
    use crate::CacheResult;

    /// Key-value table in a single SQLite file.
    pub struct SqliteStore {
        conn: Mutex<Connection>,
    }

    impl SqliteStore {
        /// Open (or create) `cache.db` in `dir` and initialise the schema.
        pub fn open(dir: &Path) -> CacheResult<Self> {
            std::fs::create_dir_all(dir)?;
            let conn = Connection::open(dir.join("cache.db"))?;

            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous  = NORMAL;
                 CREATE TABLE IF NOT EXISTS kv (
                     key   TEXT PRIMARY KEY,
                     value BLOB NOT NULL
                 );",
            )?;

            Ok(Self { conn: Mutex::new(conn) })
        }
    }

    impl KvStore for SqliteStore {
        fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        }

        fn put(&self, key: &str, value: &[u8]) -> CacheResult<()> {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )?;
            Ok(())
        }

        fn remove(&self, key: &str) -> CacheResult<()> {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            Ok(())
        }
    }
}
