//! The signup form state machine.
//!
//! ```text
//!            submit()                   endpoint OK
//!   Idle ───────────────▶ Submitting ─────────────────▶ Success
//!    ▲  │                      │                          │
//!    │  │ invalid / local dup  │ endpoint ERROR / fault   │
//!    │  ▼                      ▼                          │
//!    │ Error ◀─────────────────┘                          │
//!    │  │                                                 │
//!    └──┴──────────── next submit() resets ◀──────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. **Single flight**: while `Submitting`, `submit()` returns
//!    [`SignupError::InFlight`] and touches nothing.
//! 2. **Local first**: an email already in history never reaches the
//!    endpoint.
//! 3. **Snapshot payload**: the endpoint receives the values captured when
//!    `submit()` started; edits made while in flight do not leak into it.
//! 4. **Always settles**: every call that gets past the guard leaves a
//!    defined status and feedback text. A `submit()` future dropped while
//!    awaiting the endpoint settles to `Error` with the generic fault text.
//!
//! The controller is single-threaded (`!Sync`). All methods take `&self` so
//! that a second `submit()` can be polled while the first is suspended on
//! the endpoint; no `RefCell` borrow is held across that await.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::SignupConfig;
use crate::endpoint::{Credentials, EndpointError, EndpointStatus, MockEndpoint, SubmissionEndpoint};
use crate::history::{HistoryLog, HistoryStore, SignupRecord};
use crate::report::{Fault, FaultReporter, TracingReporter};
use crate::storage::{KeyValueStorage, MemoryStorage};
use crate::strength::{StrengthScore, score};
use crate::validation::{Field, ValidationReport, validate};

/// Feedback after a successful signup.
pub const SUCCESS_FEEDBACK: &str = "Success! Your account has been created.";
/// Feedback when the email is already in local history.
pub const DUPLICATE_LOCAL_FEEDBACK: &str =
    "This email already signed up on this device. Try a different one.";
/// Feedback when the endpoint reports the email as taken.
pub const DUPLICATE_REMOTE_FEEDBACK: &str = "This email is already registered. Try another one.";
/// Feedback when the endpoint call itself fails.
pub const FAULT_FEEDBACK: &str = "Something went wrong. Please try again.";

// ---------------------------------------------------------------------------
// FormStatus
// ---------------------------------------------------------------------------

/// Lifecycle of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl FormStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SignupError
// ---------------------------------------------------------------------------

/// Why a submission did not create an account.
///
/// `Display` renders the user-facing feedback for every variant that
/// settles the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupError {
    /// One or both fields failed validation.
    Invalid(ValidationReport),
    /// The email is already in local history.
    DuplicateLocal { email: String },
    /// The endpoint reported the email as already registered.
    DuplicateRemote { email: String },
    /// The endpoint call failed.
    Endpoint(EndpointError),
    /// A submission was already in flight; this call was ignored.
    InFlight,
}

impl fmt::Display for SignupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(report) => f.write_str(&report.feedback()),
            Self::DuplicateLocal { .. } => f.write_str(DUPLICATE_LOCAL_FEEDBACK),
            Self::DuplicateRemote { .. } => f.write_str(DUPLICATE_REMOTE_FEEDBACK),
            Self::Endpoint(_) => f.write_str(FAULT_FEEDBACK),
            Self::InFlight => f.write_str("a submission is already in flight"),
        }
    }
}

impl std::error::Error for SignupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Endpoint(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct FormState {
    email: String,
    password: String,
    status: FormStatus,
    feedback: Option<String>,
    field_errors: ValidationReport,
}

impl FormState {
    fn reset_feedback(&mut self) {
        self.status = FormStatus::Idle;
        self.feedback = None;
        self.field_errors = ValidationReport::default();
    }

    fn settle(&mut self, status: FormStatus, feedback: impl Into<String>) {
        self.status = status;
        self.feedback = Some(feedback.into());
    }
}

// ---------------------------------------------------------------------------
// FormController
// ---------------------------------------------------------------------------

/// Orchestrates validation, duplicate checks, submission, and history.
pub struct FormController {
    state: RefCell<FormState>,
    history: RefCell<HistoryStore>,
    endpoint: Arc<dyn SubmissionEndpoint>,
    reporter: Arc<dyn FaultReporter>,
    clock: Arc<dyn Clock>,
}

impl FormController {
    /// Start configuring a controller.
    #[must_use]
    pub fn builder() -> FormControllerBuilder {
        FormControllerBuilder::default()
    }

    /// Replace the email field. No validation happens until `submit()`.
    pub fn set_email(&self, value: impl Into<String>) {
        self.state.borrow_mut().email = value.into();
    }

    /// Replace the password field. No validation happens until `submit()`.
    pub fn set_password(&self, value: impl Into<String>) {
        self.state.borrow_mut().password = value.into();
    }

    #[must_use]
    pub fn email(&self) -> String {
        self.state.borrow().email.clone()
    }

    #[must_use]
    pub fn password(&self) -> String {
        self.state.borrow().password.clone()
    }

    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.state.borrow().status
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.status() == FormStatus::Submitting
    }

    /// User-facing feedback from the last settled submission.
    #[must_use]
    pub fn feedback(&self) -> Option<String> {
        self.state.borrow().feedback.clone()
    }

    /// Per-field errors from the last validation pass.
    #[must_use]
    pub fn field_errors(&self) -> ValidationReport {
        self.state.borrow().field_errors.clone()
    }

    /// Inline error for a single field.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<String> {
        self.state.borrow().field_errors.field_error(field)
    }

    /// Live strength of the current password.
    #[must_use]
    pub fn strength(&self) -> StrengthScore {
        score(&self.state.borrow().password)
    }

    /// Snapshot of signup history, most recent first.
    #[must_use]
    pub fn history(&self) -> HistoryLog {
        self.history.borrow().log().clone()
    }

    /// Forget every past signup, in memory and in storage.
    pub fn clear_history(&self) -> HistoryLog {
        self.history.borrow_mut().clear().clone()
    }

    /// Run one submission attempt.
    ///
    /// Returns the new history record on success. Every error except
    /// [`SignupError::InFlight`] has already been reflected in
    /// [`status`](Self::status) and [`feedback`](Self::feedback).
    pub async fn submit(&self) -> Result<SignupRecord, SignupError> {
        let payload = self.begin_submit()?;

        let pending = PendingSubmit::arm(&self.state);
        let outcome = self.endpoint.submit(payload.clone()).await;
        pending.disarm();

        let mut state = self.state.borrow_mut();
        match outcome {
            Ok(response) if response.status == EndpointStatus::Ok => {
                let record = SignupRecord::new(payload.email, self.clock.now_millis());
                state.settle(FormStatus::Success, SUCCESS_FEEDBACK);
                state.email.clear();
                state.password.clear();
                drop(state);

                self.history.borrow_mut().append(record.clone());
                tracing::debug!(email = %record.email, timestamp = record.timestamp, "signup succeeded");
                Ok(record)
            }
            Ok(_) => {
                let err = SignupError::DuplicateRemote {
                    email: payload.email,
                };
                state.settle(FormStatus::Error, err.to_string());
                tracing::debug!(status = %state.status, "endpoint reported duplicate email");
                Err(err)
            }
            Err(e) => {
                self.reporter.report(&Fault::Endpoint(e.clone()));
                let err = SignupError::Endpoint(e);
                state.settle(FormStatus::Error, err.to_string());
                Err(err)
            }
        }
    }

    /// Guard, reset, validate, and duplicate-check; on success move to
    /// `Submitting` and hand back the payload snapshot.
    fn begin_submit(&self) -> Result<Credentials, SignupError> {
        let mut state = self.state.borrow_mut();
        if state.status == FormStatus::Submitting {
            tracing::debug!("submission already in flight, ignoring submit");
            return Err(SignupError::InFlight);
        }

        state.reset_feedback();
        let email = state.email.trim().to_string();

        let report = validate(&email, &state.password);
        if !report.is_valid() {
            let err = SignupError::Invalid(report.clone());
            state.settle(FormStatus::Error, err.to_string());
            state.field_errors = report;
            tracing::debug!(email = %email, "validation failed");
            return Err(err);
        }

        if self.history.borrow().contains_email(&email) {
            let err = SignupError::DuplicateLocal { email };
            state.settle(FormStatus::Error, err.to_string());
            tracing::debug!("email already in local history");
            return Err(err);
        }

        state.status = FormStatus::Submitting;
        tracing::debug!(email = %email, status = %state.status, "submitting signup");
        Ok(Credentials::new(email, state.password.clone()))
    }
}

/// Settles the form if a `submit()` future is dropped while the endpoint
/// call is pending, so the status never stays `Submitting`.
struct PendingSubmit<'a> {
    state: &'a RefCell<FormState>,
    armed: bool,
}

impl<'a> PendingSubmit<'a> {
    fn arm(state: &'a RefCell<FormState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        if state.status == FormStatus::Submitting {
            state.settle(FormStatus::Error, FAULT_FEEDBACK);
            tracing::warn!(status = %state.status, "submission dropped before the endpoint answered");
        }
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FormController")
            .field("email", &state.email)
            .field("status", &state.status)
            .field("feedback", &state.feedback)
            .field("history", &self.history.borrow())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// FormControllerBuilder
// ---------------------------------------------------------------------------

/// Builder for [`FormController`].
///
/// Defaults: [`SignupConfig::default`], [`MemoryStorage`], a [`MockEndpoint`]
/// using the configured delay, [`TracingReporter`], and [`SystemClock`].
#[derive(Default)]
pub struct FormControllerBuilder {
    config: SignupConfig,
    storage: Option<Arc<dyn KeyValueStorage>>,
    endpoint: Option<Arc<dyn SubmissionEndpoint>>,
    reporter: Option<Arc<dyn FaultReporter>>,
    clock: Option<Arc<dyn Clock>>,
}

impl FormControllerBuilder {
    #[must_use]
    pub fn config(mut self, config: SignupConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: Arc<dyn SubmissionEndpoint>) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn FaultReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Load history and assemble the controller.
    #[must_use]
    pub fn build(self) -> FormController {
        let reporter: Arc<dyn FaultReporter> = match self.reporter {
            Some(reporter) => reporter,
            None => Arc::new(TracingReporter),
        };
        let storage: Arc<dyn KeyValueStorage> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(MemoryStorage::new()),
        };
        let endpoint: Arc<dyn SubmissionEndpoint> = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Arc::new(MockEndpoint::new(self.config.endpoint_delay)),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let history = HistoryStore::load(storage, Arc::clone(&reporter), &self.config);

        FormController {
            state: RefCell::new(FormState::default()),
            history: RefCell::new(history),
            endpoint,
            reporter,
            clock,
        }
    }
}
