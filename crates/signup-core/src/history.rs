//! Bounded, persisted history of successful signups.
//!
//! # Design Invariants
//!
//! 1. **Bounded**: the log never holds more than `history_capacity` records.
//! 2. **Most recent first**: new records are prepended; the oldest fall off.
//! 3. **Write-through**: every mutation is written to storage before it
//!    returns.
//! 4. **Fail soft**: unreadable or unwritable storage is reported to the
//!    [`FaultReporter`] and never blocks the form. In-memory state stays
//!    authoritative for the session.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SignupConfig;
use crate::report::{Fault, FaultReporter};
use crate::storage::{KeyValueStorage, StorageError, StorageResult};

/// One successful signup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignupRecord {
    /// Normalized email address.
    pub email: String,
    /// Signup time in epoch milliseconds.
    pub timestamp: i64,
}

impl SignupRecord {
    #[must_use]
    pub fn new(email: impl Into<String>, timestamp: i64) -> Self {
        Self {
            email: email.into(),
            timestamp,
        }
    }
}

/// Ordered signup records, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<SignupRecord>,
}

impl HistoryLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from records already in most-recent-first order.
    #[must_use]
    pub fn from_records(records: Vec<SignupRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[SignupRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignupRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record.
    #[must_use]
    pub fn latest(&self) -> Option<&SignupRecord> {
        self.records.first()
    }

    /// Case-insensitive exact match against stored emails.
    #[must_use]
    pub fn contains_email(&self, email: &str) -> bool {
        let needle = email.to_lowercase();
        self.records
            .iter()
            .any(|r| r.email.to_lowercase() == needle)
    }

    fn prepend_bounded(&mut self, record: SignupRecord, capacity: usize) {
        self.records.insert(0, record);
        self.records.truncate(capacity);
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a SignupRecord;
    type IntoIter = std::slice::Iter<'a, SignupRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Owner of the history log and its persisted copy.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    reporter: Arc<dyn FaultReporter>,
    key: String,
    capacity: usize,
    log: HistoryLog,
}

impl HistoryStore {
    /// Load history from `storage`.
    ///
    /// A missing key yields an empty log. Unreadable or unparsable data also
    /// yields an empty log and is reported as [`Fault::StorageRead`].
    #[must_use]
    pub fn load(
        storage: Arc<dyn KeyValueStorage>,
        reporter: Arc<dyn FaultReporter>,
        config: &SignupConfig,
    ) -> Self {
        let capacity = config.history_capacity.max(1);
        let log = match read_log(storage.as_ref(), &config.storage_key) {
            Ok(mut log) => {
                if log.len() > capacity {
                    tracing::warn!(
                        stored = log.len(),
                        capacity,
                        "persisted history exceeds capacity, truncating"
                    );
                    log.records.truncate(capacity);
                }
                log
            }
            Err(e) => {
                reporter.report(&Fault::StorageRead(e));
                HistoryLog::new()
            }
        };

        tracing::debug!(
            backend = %storage.name(),
            entries = log.len(),
            "loaded signup history"
        );

        Self {
            storage,
            reporter,
            key: config.storage_key.clone(),
            capacity,
            log,
        }
    }

    /// Current log.
    #[must_use]
    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// See [`HistoryLog::contains_email`].
    #[must_use]
    pub fn contains_email(&self, email: &str) -> bool {
        self.log.contains_email(email)
    }

    /// Prepend `record`, drop anything beyond capacity, and persist.
    pub fn append(&mut self, record: SignupRecord) -> &HistoryLog {
        self.log.prepend_bounded(record, self.capacity);
        if let Err(e) = self.persist() {
            self.reporter.report(&Fault::StorageWrite(e));
        }
        &self.log
    }

    /// Empty the log and remove the persisted entry.
    pub fn clear(&mut self) -> &HistoryLog {
        self.log = HistoryLog::new();
        match self.storage.remove(&self.key) {
            Ok(()) => tracing::debug!(key = %self.key, "cleared signup history"),
            Err(e) => self.reporter.report(&Fault::StorageWrite(e)),
        }
        &self.log
    }

    fn persist(&self) -> StorageResult<()> {
        let text = serde_json::to_string(&self.log)?;
        self.storage.set(&self.key, &text)?;
        tracing::debug!(key = %self.key, entries = self.log.len(), "persisted signup history");
        Ok(())
    }
}

fn read_log(storage: &dyn KeyValueStorage, key: &str) -> StorageResult<HistoryLog> {
    match storage.get(key)? {
        None => Ok(HistoryLog::new()),
        Some(text) => serde_json::from_str(&text).map_err(|e| {
            StorageError::Serialization(format!("failed to parse signup history: {e}"))
        }),
    }
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("backend", &self.storage.name())
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("entries", &self.log.len())
            .finish()
    }
}
