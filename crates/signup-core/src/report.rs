//! Fault reporting.
//!
//! Faults are recovered where they happen; the reporter only gets told about
//! them. Reporting is fire-and-forget and must not fail.

use std::fmt;
use std::sync::Mutex;

use crate::endpoint::EndpointError;
use crate::storage::StorageError;

/// A recovered failure worth surfacing to observability.
#[derive(Debug)]
pub enum Fault {
    /// The submission endpoint failed instead of answering.
    Endpoint(EndpointError),
    /// Persisted history could not be read or parsed.
    StorageRead(StorageError),
    /// Persisted history could not be written or removed.
    StorageWrite(StorageError),
}

impl Fault {
    /// Short stable name for logs and assertions.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Endpoint(_) => "endpoint",
            Self::StorageRead(_) => "storage_read",
            Self::StorageWrite(_) => "storage_write",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endpoint(e) => write!(f, "signup endpoint failed: {e}"),
            Self::StorageRead(e) => write!(f, "failed to read signup history: {e}"),
            Self::StorageWrite(e) => write!(f, "failed to write signup history: {e}"),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Endpoint(e) => Some(e),
            Self::StorageRead(e) | Self::StorageWrite(e) => Some(e),
        }
    }
}

/// Receiver for recovered faults.
pub trait FaultReporter: Send + Sync {
    fn report(&self, fault: &Fault);
}

/// Default reporter: logs every fault through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FaultReporter for TracingReporter {
    fn report(&self, fault: &Fault) {
        tracing::error!(kind = fault.kind(), error = %fault, "recovered fault");
    }
}

/// Reporter that keeps every fault it sees, as `(kind, message)` pairs.
///
/// Useful in tests and for surfacing recent faults in a diagnostics view.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    seen: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded faults, oldest first.
    #[must_use]
    pub fn faults(&self) -> Vec<(&'static str, String)> {
        self.seen.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Kinds of recorded faults, oldest first.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.faults().into_iter().map(|(kind, _)| kind).collect()
    }
}

impl FaultReporter for RecordingReporter {
    fn report(&self, fault: &Fault) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((fault.kind(), fault.to_string()));
        }
    }
}
