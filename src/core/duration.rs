//! Human-readable durations such as `3d`, `60s` or `1h30m`
//!
//! Used by the configuration file and by system-authored ticket notes.

use crate::error::{HelpdeskError, Result};
use chrono::Duration;

/// Parse a duration string like "3d", "1h30m", "45m" or "60s"
///
/// A trailing number without a unit is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let text = input.trim().to_lowercase();
    let invalid = || {
        HelpdeskError::Config(format!(
            "Invalid duration: '{input}'. Use a format like '3d', '1h30m', '45m' or '60s'"
        ))
    };

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        let unit = match c {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return Err(invalid()),
        };
        let value: i64 = current_num.parse().map_err(|_| invalid())?;
        total_seconds = value
            .checked_mul(unit)
            .and_then(|secs| total_seconds.checked_add(secs))
            .ok_or_else(invalid)?;
        current_num.clear();
    }

    if !current_num.is_empty() {
        let seconds: i64 = current_num.parse().map_err(|_| invalid())?;
        total_seconds = total_seconds.checked_add(seconds).ok_or_else(invalid)?;
    }

    if total_seconds == 0 {
        return Err(invalid());
    }

    Duration::try_seconds(total_seconds).ok_or_else(invalid)
}

/// Compact form that [`parse_duration`] reads back, e.g. `3d`, `1h30m`
#[must_use]
pub fn format_compact(duration: Duration) -> String {
    let mut secs = duration.num_seconds().max(0);
    if secs == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    for (unit, size) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        let value = secs / size;
        if value > 0 {
            out.push_str(&format!("{value}{unit}"));
            secs %= size;
        }
    }
    out
}

/// Long form for sentences, e.g. "3 days", "1 hour 30 minutes"
#[must_use]
pub fn format_long(duration: Duration) -> String {
    let mut secs = duration.num_seconds().max(0);
    let mut parts = Vec::new();
    for (unit, size) in [("day", 86_400), ("hour", 3_600), ("minute", 60), ("second", 1)] {
        let value = secs / size;
        if value > 0 {
            let plural = if value == 1 { "" } else { "s" };
            parts.push(format!("{value} {unit}{plural}"));
            secs %= size;
        }
    }
    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.join(" ")
    }
}

/// Serde adapter storing a [`Duration`] as its compact string form
pub mod serde_compact {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_compact(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
