//! Property-based invariant tests for field validation and strength scoring.
//!
//! 1. Anything without exactly one `@` is not an email.
//! 2. A one-character TLD is rejected; two or more is accepted.
//! 3. Short passwords always fail the length rule.
//! 4. The strength score and the validator agree rule for rule.
//! 5. Percent and label are determined by the pass count.
//! 6. No panics on arbitrary input.

use proptest::prelude::*;
use signup_core::rules::{ERROR_CODE_MIN_LENGTH, PASSWORD_RULES};
use signup_core::strength::score;
use signup_core::validation::{validate, validate_email, validate_password};

// ── Helpers ─────────────────────────────────────────────────────────────

fn label_part() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Exactly one `@`
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_at_sign_is_never_an_email(s in "[^@]{0,40}") {
        prop_assert!(!validate_email(&s), "accepted {:?}", s);
    }

    #[test]
    fn several_at_signs_are_never_an_email(
        a in "[^@]{0,10}",
        b in "[^@]{0,10}",
        c in "[^@]{0,10}",
        extra in prop::collection::vec("[^@]{0,5}", 0..3),
    ) {
        let mut s = format!("{a}@{b}@{c}");
        for part in extra {
            s.push('@');
            s.push_str(&part);
        }
        prop_assert!(!validate_email(&s), "accepted {:?}", s);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. TLD length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_char_tld_rejected(local in label_part(), domain in label_part(), tld in "[a-z]") {
        let email = format!("{local}@{domain}.{tld}");
        prop_assert!(!validate_email(&email), "accepted {:?}", email);
    }

    #[test]
    fn multi_char_tld_accepted(local in label_part(), domain in label_part(), tld in "[a-z]{2,6}") {
        let email = format!("{local}@{domain}.{tld}");
        prop_assert!(validate_email(&email), "rejected {:?}", email);
    }

    #[test]
    fn double_dots_rejected_anywhere(local in label_part(), domain in label_part(), tld in "[a-z]{2,6}") {
        let in_local = format!("{local}..x@{domain}.{tld}");
        let in_domain = format!("{local}@{domain}..{tld}");
        prop_assert!(!validate_email(&in_local));
        prop_assert!(!validate_email(&in_domain));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Length rule
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn short_passwords_fail_length(p in "[ -~]{0,7}") {
        let issues = validate_password(&p);
        prop_assert!(issues.iter().any(|e| e.code == ERROR_CODE_MIN_LENGTH));
    }

    #[test]
    fn long_passwords_pass_length(p in "[ -~]{8,32}") {
        let issues = validate_password(&p);
        prop_assert!(issues.iter().all(|e| e.code != ERROR_CODE_MIN_LENGTH));
    }
}

#[test]
fn reference_passwords() {
    assert_eq!(validate_password("Ab1!").len(), 1);
    assert!(validate_password("Abcdefg1!").is_empty());
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Scorer and validator agree
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn score_matches_validator(p in any::<String>()) {
        let issues = validate_password(&p);
        let s = score(&p);

        prop_assert_eq!(s.total, PASSWORD_RULES.len());
        prop_assert_eq!(s.passed, s.total - issues.len());

        let failing_labels: Vec<_> = s.rules.iter().filter(|r| !r.passed).map(|r| r.label).collect();
        let issue_labels: Vec<_> = issues
            .iter()
            .map(|e| {
                PASSWORD_RULES
                    .iter()
                    .find(|r| r.code == e.code)
                    .map(|r| r.label)
                    .unwrap_or_default()
            })
            .collect();
        prop_assert_eq!(failing_labels, issue_labels);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Percent and label depend only on pass count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn percent_and_label_follow_pass_count(p in any::<String>()) {
        let s = score(&p);
        let (percent, label) = match s.passed {
            0 => (0, "Needs work"),
            1 => (33, "Fair"),
            2 => (67, "Strong"),
            _ => (100, "Excellent"),
        };
        prop_assert_eq!(s.percent, percent);
        prop_assert_eq!(s.label, label);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. No panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn validate_never_panics(email in any::<String>(), password in any::<String>()) {
        let report = validate(&email, &password);
        prop_assert_eq!(report.is_valid(), report.feedback().is_empty());
    }
}
