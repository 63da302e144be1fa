//! Field validation for the signup form.
//!
//! Validation is pure: it never touches history, storage, or the endpoint.

use std::fmt;

use crate::rules::PASSWORD_RULES;

/// Error code for email validation.
pub const ERROR_CODE_EMAIL: &str = "email";

/// Message reported for a malformed email address.
pub const EMAIL_ISSUE: &str = "Please enter a valid email address that includes “@” and a domain.";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation failure with a stable code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code for programmatic handling.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// Check an email address against the form's rules.
///
/// - exactly one `@`
/// - non-empty local part that neither starts nor ends with `.` and has no `..`
/// - a domain containing a `.` that is neither first nor last, with no `..`
/// - a top-level domain of at least two characters
///
/// The caller is expected to trim the value first.
#[must_use]
pub fn validate_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.starts_with('.') || local.ends_with('.') || local.contains("..")
    {
        return false;
    }

    match domain.find('.') {
        None | Some(0) => return false,
        Some(_) => {}
    }
    if domain.ends_with('.') || domain.contains("..") {
        return false;
    }

    let tld = domain.rsplit('.').next().unwrap_or_default();
    tld.encode_utf16().count() >= 2
}

// ---------------------------------------------------------------------------
// Password
// ---------------------------------------------------------------------------

/// Check a password against every rule in the catalog.
///
/// Returns one error per failing rule, in catalog order. An empty vector
/// means the password is acceptable.
#[must_use]
pub fn validate_password(value: &str) -> Vec<ValidationError> {
    PASSWORD_RULES
        .iter()
        .filter(|rule| !rule.passes(value))
        .map(|rule| ValidationError::new(rule.code, rule.issue))
        .collect()
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// A form field that can carry an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
}

/// Per-field outcome of validating the whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Email failure, if any.
    pub email: Option<ValidationError>,
    /// Password failures, in catalog order.
    pub password: Vec<ValidationError>,
}

impl ValidationReport {
    /// Returns `true` when neither field has an issue.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_empty()
    }

    /// All messages, email first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.email
            .iter()
            .chain(self.password.iter())
            .map(|e| e.message.as_str())
    }

    /// Combined user-facing feedback: every message joined by a space.
    #[must_use]
    pub fn feedback(&self) -> String {
        self.messages().collect::<Vec<_>>().join(" ")
    }

    /// Inline message for one field, or `None` if the field is fine.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<String> {
        match field {
            Field::Email => self.email.as_ref().map(|e| e.message.clone()),
            Field::Password if self.password.is_empty() => None,
            Field::Password => Some(
                self.password
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

/// Validate both fields of the form.
///
/// `email` should already be normalized.
#[must_use]
pub fn validate(email: &str, password: &str) -> ValidationReport {
    ValidationReport {
        email: (!validate_email(email)).then(|| ValidationError::new(ERROR_CODE_EMAIL, EMAIL_ISSUE)),
        password: validate_password(password),
    }
}
