//! Ordering of replication values

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde_json::Value;
use std::cmp::Ordering;

/// Compare two replication values
///
/// Numbers compare numerically. Strings that both parse as timestamps
/// compare as instants, other strings lexicographically. Any other pairing
/// is incomparable and yields `None`.
pub fn compare_replication_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        _ => None,
    }
}

/// Parse the timestamp formats Jira and Singer configs use
///
/// Accepts RFC 3339, Jira's `2024-01-01T10:00:00.000+0000` and a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_local_timestamp(s).map(|dt| dt.with_timezone(&Utc))
}

/// Parse a timestamp keeping the offset it was written with
///
/// Bare dates get a zero offset.
pub fn parse_local_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
