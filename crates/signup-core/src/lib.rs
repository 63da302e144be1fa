#![forbid(unsafe_code)]

//! Signup form core.
//!
//! This crate holds everything about the signup form that is not rendering:
//! field validation, password strength, the bounded signup history, and the
//! state machine that ties them to an asynchronous submission endpoint.
//!
//! # Key Components
//!
//! - [`rules::PASSWORD_RULES`] - Ordered password rule catalog
//! - [`validation`] - Email and password validation
//! - [`strength`] - Live password strength score and checklist
//! - [`HistoryStore`] - Bounded, persisted signup history
//! - [`KeyValueStorage`] - Injected text storage (`MemoryStorage`, `FileStorage`)
//! - [`SubmissionEndpoint`] - Async signup service (`MockEndpoint`)
//! - [`FormController`] - The submission state machine
//!
//! # Example
//!
//! ```rust,no_run
//! use signup_core::{FormController, FormStatus};
//!
//! # async fn demo() {
//! let form = FormController::builder().build();
//! form.set_email("new@example.com");
//! form.set_password("Password123!");
//!
//! let record = form.submit().await.expect("fresh email is accepted");
//! assert_eq!(form.status(), FormStatus::Success);
//! assert_eq!(form.history().latest(), Some(&record));
//! # }
//! ```
//!
//! # Feature Gates
//!
//! - `file-storage`: JSON file backend for history that survives restarts.

pub mod clock;
pub mod config;
pub mod controller;
pub mod endpoint;
pub mod history;
pub mod report;
pub mod rules;
pub mod storage;
pub mod strength;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SignupConfig;
pub use controller::{FormController, FormControllerBuilder, FormStatus, SignupError};
pub use endpoint::{
    Credentials, EndpointError, EndpointResponse, EndpointStatus, MockEndpoint, SubmissionEndpoint,
};
pub use history::{HistoryLog, HistoryStore, SignupRecord};
pub use report::{Fault, FaultReporter, RecordingReporter, TracingReporter};
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use storage::{KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use strength::{RuleState, StrengthScore};
pub use validation::{Field, ValidationError, ValidationReport};
