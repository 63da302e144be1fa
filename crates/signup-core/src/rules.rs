//! The password rule catalog.
//!
//! Both [`validate_password`](crate::validation::validate_password) and
//! [`score`](crate::strength::score) walk [`PASSWORD_RULES`] in order, so a
//! rule added here shows up in validation messages and in the strength
//! meter at the same time.

use std::fmt;

/// Error code for a password with no special character.
pub const ERROR_CODE_SPECIAL_CHARACTER: &str = "special_character";
/// Error code for a password with no digit.
pub const ERROR_CODE_NUMBER: &str = "number";
/// Error code for a password shorter than [`MIN_PASSWORD_LENGTH`].
pub const ERROR_CODE_MIN_LENGTH: &str = "min_length";

/// Minimum password length, in UTF-16 code units.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A named password predicate.
#[derive(Clone, Copy)]
pub struct PasswordRule {
    /// Stable code for programmatic handling.
    pub code: &'static str,
    /// Checklist label shown next to the strength meter.
    pub label: &'static str,
    /// Message reported when the rule fails.
    pub issue: &'static str,
    /// Returns `true` if the password satisfies the rule.
    pub check: fn(&str) -> bool,
}

impl PasswordRule {
    /// Apply the rule to `password`.
    #[must_use]
    pub fn passes(&self, password: &str) -> bool {
        (self.check)(password)
    }
}

impl fmt::Debug for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordRule")
            .field("code", &self.code)
            .field("label", &self.label)
            .finish()
    }
}

/// At least one character outside `[A-Za-z0-9]`.
#[must_use]
pub fn has_special_character(value: &str) -> bool {
    value.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// At least one ASCII decimal digit.
#[must_use]
pub fn has_number(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

/// Length of at least [`MIN_PASSWORD_LENGTH`] UTF-16 code units.
#[must_use]
pub fn has_valid_length(value: &str) -> bool {
    value.encode_utf16().count() >= MIN_PASSWORD_LENGTH
}

/// The ordered password rule catalog.
pub const PASSWORD_RULES: [PasswordRule; 3] = [
    PasswordRule {
        code: ERROR_CODE_SPECIAL_CHARACTER,
        label: "At least one special character",
        issue: "Password needs at least one special character.",
        check: has_special_character,
    },
    PasswordRule {
        code: ERROR_CODE_NUMBER,
        label: "At least one number",
        issue: "Password needs at least one number.",
        check: has_number,
    },
    PasswordRule {
        code: ERROR_CODE_MIN_LENGTH,
        label: "Minimum of 8 characters",
        issue: "Password needs to be at least 8 characters long.",
        check: has_valid_length,
    },
];
