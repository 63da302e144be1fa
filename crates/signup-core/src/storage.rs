//! Key-value text storage for persisted form state.
//!
//! [`HistoryStore`](crate::history::HistoryStore) is handed a
//! [`KeyValueStorage`] at construction and only ever reads, writes, or
//! removes its one key through it. A missing key is `Ok(None)`; everything
//! else that goes wrong surfaces as a [`StorageError`] for the caller to
//! report.
//!
//! [`MemoryStorage`] is always available. [`FileStorage`] requires the
//! `file-storage` feature.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Why a storage operation failed.
#[derive(Debug)]
pub enum StorageError {
    /// The backing file could not be read, written, or removed.
    Io(std::io::Error),
    /// Stored text is not the JSON it should be.
    Serialization(String),
    /// The backend is unusable: poisoned lock or an unknown document format.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "storage I/O failed: {e}"),
            Self::Serialization(msg) => write!(f, "stored data is not valid JSON: {msg}"),
            Self::Corruption(msg) => write!(f, "storage is unusable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Corruption("lock poisoned".into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Injected key-value text storage.
pub trait KeyValueStorage: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Value under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStorage
// ─────────────────────────────────────────────────────────────────────────────

/// Ephemeral storage for tests and `--memory` sessions.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `entries`.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            data: RwLock::new(entries),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.data.write()?.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("entries", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FileStorage
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "file-storage")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::ffi::OsString;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    const FORMAT_VERSION: u32 = 1;

    #[derive(Serialize, Deserialize)]
    struct Document {
        format_version: u32,
        entries: HashMap<String, String>,
    }

    impl Default for Document {
        fn default() -> Self {
            Self {
                format_version: FORMAT_VERSION,
                entries: HashMap::new(),
            }
        }
    }

    /// Every key in one JSON document on disk.
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "signupHistory": "[{\"email\":\"a@b.com\",\"timestamp\":1700000000000}]"
    ///   }
    /// }
    /// ```
    ///
    /// Mutations write `<path>.tmp` and rename it over the document. Removing
    /// the last key deletes the file. A document that cannot be read is
    /// discarded, with a warning, by the next `set` or `remove`.
    pub struct FileStorage {
        path: PathBuf,
        lock: RwLock<()>,
    }

    impl FileStorage {
        /// Storage backed by `path`. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                lock: RwLock::new(()),
            }
        }

        /// `<state dir>/<app_name>/storage.json`, where the state dir is
        /// `$XDG_STATE_HOME`, else `$HOME/.local/state`, else `.`.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            Self::new(state_dir().join(app_name).join("storage.json"))
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> StorageResult<Document> {
            let file = match File::open(&self.path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(Document::default());
                }
                Err(e) => return Err(e.into()),
            };
            let doc: Document = serde_json::from_reader(BufReader::new(file))?;
            if doc.format_version != FORMAT_VERSION {
                return Err(StorageError::Corruption(format!(
                    "document format {} is not {FORMAT_VERSION}",
                    doc.format_version
                )));
            }
            Ok(doc)
        }

        /// Replacement for a document a mutation could not read.
        fn discard(&self, e: StorageError, op: &'static str) -> Document {
            tracing::warn!(path = %self.path.display(), op, error = %e, "discarding unreadable storage file");
            Document::default()
        }

        fn store(&self, doc: &Document) -> StorageResult<()> {
            if doc.entries.is_empty() {
                return match fs::remove_file(&self.path) {
                    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                    _ => {
                        tracing::debug!(path = %self.path.display(), "storage file removed");
                        Ok(())
                    }
                };
            }

            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            let mut tmp = OsString::from(self.path.as_os_str());
            tmp.push(".tmp");
            let tmp = PathBuf::from(tmp);

            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, doc)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            drop(writer);
            fs::rename(&tmp, &self.path)?;

            tracing::debug!(path = %self.path.display(), keys = doc.entries.len(), "storage file written");
            Ok(())
        }
    }

    fn state_dir() -> PathBuf {
        let non_empty = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());
        match (non_empty("XDG_STATE_HOME"), non_empty("HOME")) {
            (Some(state), _) => PathBuf::from(state),
            (None, Some(home)) => PathBuf::from(home).join(".local/state"),
            (None, None) => PathBuf::from("."),
        }
    }

    impl KeyValueStorage for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            let _guard = self.lock.read()?;
            Ok(self.load()?.entries.remove(key))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            let _guard = self.lock.write()?;
            let mut doc = self.load().unwrap_or_else(|e| self.discard(e, "set"));
            doc.entries.insert(key.to_string(), value.to_string());
            self.store(&doc)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let _guard = self.lock.write()?;
            let mut doc = match self.load() {
                Ok(doc) if !doc.entries.contains_key(key) => return Ok(()),
                Ok(doc) => doc,
                Err(e) => self.discard(e, "remove"),
            };
            doc.entries.remove(key);
            self.store(&doc)
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
