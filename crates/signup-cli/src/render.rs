//! Plain-text rendering of form state.
//!
//! Everything here returns unstyled strings; color is applied by the
//! session when writing to the terminal.

use crossterm::style::Color;
use signup_core::{FormStatus, HistoryLog, SignupRecord, StrengthScore};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const METER_WIDTH: usize = 10;

/// `[██████░░░░] 67% Strong`
#[must_use]
pub fn strength_meter(score: &StrengthScore) -> String {
    let filled = (usize::from(score.percent) * METER_WIDTH + 50) / 100;
    let filled = filled.min(METER_WIDTH);
    format!(
        "[{}{}] {}% {}",
        "█".repeat(filled),
        "░".repeat(METER_WIDTH - filled),
        score.percent,
        score.label
    )
}

/// One line per catalog rule, `✔` for passing and `•` for failing.
#[must_use]
pub fn checklist(score: &StrengthScore) -> Vec<String> {
    score
        .rules
        .iter()
        .map(|rule| format!("{} {}", if rule.passed { "✔" } else { "•" }, rule.label))
        .collect()
}

/// Epoch millis as RFC 3339 (UTC). Out-of-range values fall back to the raw
/// number.
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("{millis}ms"))
}

#[must_use]
pub fn history_line(record: &SignupRecord) -> String {
    format!("{}  {}", record.email, format_timestamp(record.timestamp))
}

/// History panel body. Empty history renders nothing.
#[must_use]
pub fn history(log: &HistoryLog) -> Vec<String> {
    log.iter().map(history_line).collect()
}

/// Terminal color for feedback in a given status.
#[must_use]
pub fn status_color(status: FormStatus) -> Color {
    match status {
        FormStatus::Idle => Color::Reset,
        FormStatus::Submitting => Color::Yellow,
        FormStatus::Success => Color::Green,
        FormStatus::Error => Color::Red,
    }
}
