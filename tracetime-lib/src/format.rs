//! Formatting helpers for elapsed-time display.

/// Format a second count as `HH:MM:SS.ss`.
///
/// Hours are unbounded and zero-padded to at least two digits; minutes and
/// seconds are zero-padded to two digits, seconds with exactly two decimal
/// places. Negative or non-finite input is clamped to zero.
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    // Work in whole hundredths so rounding can never produce "60.00".
    let hundredths = (seconds * 100.0).round() as u64;
    let hours = hundredths / 360_000;
    let minutes = hundredths % 360_000 / 6_000;
    let rest = hundredths % 6_000;

    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, rest / 100, rest % 100)
}

/// Right-justify `text` within `columns` terminal columns.
///
/// Text wider than the terminal is truncated with a trailing ellipsis so the
/// line never wraps; otherwise the remainder is padded on the left.
pub fn right_justify(text: &str, columns: usize) -> String {
    let length = text.chars().count();
    if length > columns {
        let keep = columns.saturating_sub(3);
        let truncated: String = text.chars().take(keep).collect();
        format!("{}...", truncated)
    } else {
        format!("{:>width$}", text, width = columns)
    }
}
