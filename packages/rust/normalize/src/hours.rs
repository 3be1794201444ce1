//! Opening-hours normalization to `HH:MM-HH:MM`.

use std::sync::LazyLock;

use regex::Regex;

/// `H:MM`, `H.MM`, optionally followed by AM/PM (input already upper-cased).
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[.:](\d{2})\s*(AM|PM)?$").expect("time regex")
});

/// Normalize a clock time to zero-padded 24-hour `HH:MM`.
///
/// Returns `None` for anything unparseable or out of range.
pub fn normalize_time(value: &str) -> Option<String> {
    let text = value.trim().to_uppercase();
    let caps = TIME_RE.captures(&text)?;

    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;

    match caps.get(3).map(|m| m.as_str()) {
        Some("PM") if hour != 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }

    (hour < 24 && minute < 60).then(|| format!("{hour:02}:{minute:02}"))
}

/// Build an `HH:MM-HH:MM` range when the source publishes one set of hours
/// for every day and both ends parse.
pub fn format_hours(same_every_day: bool, open: Option<&str>, close: Option<&str>) -> Option<String> {
    if !same_every_day {
        return None;
    }
    let open = normalize_time(open?)?;
    let close = normalize_time(close?)?;
    Some(format!("{open}-{close}"))
}
