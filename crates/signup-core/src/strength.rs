//! Live password strength feedback.

use crate::rules::PASSWORD_RULES;

const STRENGTH_LABELS: [&str; 4] = ["Needs work", "Fair", "Strong", "Excellent"];

/// Pass/fail state of one catalog rule, for the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleState {
    pub label: &'static str,
    pub passed: bool,
}

/// Derived strength of a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthScore {
    /// Number of catalog rules the password satisfies.
    pub passed: usize,
    /// Number of rules in the catalog.
    pub total: usize,
    /// `passed / total` as a rounded percentage.
    pub percent: u8,
    /// Descriptive label for `passed`.
    pub label: &'static str,
    /// Per-rule checklist in catalog order.
    pub rules: Vec<RuleState>,
}

impl StrengthScore {
    /// Returns `true` when every rule passes.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.passed == self.total
    }
}

/// Score `password` against the rule catalog.
#[must_use]
pub fn score(password: &str) -> StrengthScore {
    let rules: Vec<RuleState> = PASSWORD_RULES
        .iter()
        .map(|rule| RuleState {
            label: rule.label,
            passed: rule.passes(password),
        })
        .collect();

    let passed = rules.iter().filter(|r| r.passed).count();
    let total = rules.len();

    StrengthScore {
        passed,
        total,
        percent: rounded_percent(passed, total),
        label: STRENGTH_LABELS
            .get(passed)
            .copied()
            .unwrap_or(STRENGTH_LABELS[0]),
        rules,
    }
}

/// Round-half-up percentage in integer arithmetic.
fn rounded_percent(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (passed * 200 + total) / (total * 2);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_needs_work() {
        let s = score("");
        assert_eq!(s.passed, 0);
        assert_eq!(s.total, 3);
        assert_eq!(s.percent, 0);
        assert_eq!(s.label, "Needs work");
        assert!(s.rules.iter().all(|r| !r.passed));
    }

    #[test]
    fn labels_and_percentages_per_pass_count() {
        // one rule: special char only
        let s = score("!");
        assert_eq!((s.passed, s.percent, s.label), (1, 33, "Fair"));

        // two rules: special char + number
        let s = score("!1");
        assert_eq!((s.passed, s.percent, s.label), (2, 67, "Strong"));

        let s = score("Password123!");
        assert_eq!((s.passed, s.percent, s.label), (3, 100, "Excellent"));
        assert!(s.is_complete());
    }

    #[test]
    fn checklist_follows_catalog() {
        let s = score("abcdefgh");
        let labels: Vec<_> = s.rules.iter().map(|r| (r.label, r.passed)).collect();
        assert_eq!(
            labels,
            vec![
                ("At least one special character", false),
                ("At least one number", false),
                ("Minimum of 8 characters", true),
            ]
        );
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 8), 13); // 12.5
        assert_eq!(rounded_percent(0, 0), 0);
    }
}
