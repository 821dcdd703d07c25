//! Lenient timestamp handling for stored documents.
//!
//! Timestamps are Unix milliseconds. Documents written by older clients carry
//! RFC 3339 strings or bare dates (`YYYY-MM-DD`, `MM/DD/YYYY`) instead, so
//! deserialization accepts those too. Anything unparseable becomes `None`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a textual timestamp into Unix milliseconds.
///
/// # Examples
///
/// ```
/// use firecheck_core::models::parse_timestamp;
///
/// assert_eq!(parse_timestamp("1970-01-02"), Some(86_400_000));
/// assert_eq!(parse_timestamp("01/02/1970"), Some(86_400_000));
/// assert_eq!(parse_timestamp("1970-01-01T00:00:01Z"), Some(1_000));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ms) = value.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp_millis())
}

/// Unix milliseconds of a stored JSON value, `None` when it isn't a timestamp
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => parse_timestamp(text),
        // Firestore `Timestamp` exported as {seconds, nanoseconds}
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map.get("nanoseconds").and_then(Value::as_i64).unwrap_or(0);
            seconds.checked_mul(1_000)?.checked_add(nanos / 1_000_000)
        }
        _ => None,
    }
}

/// Deserialize an optional timestamp, mapping malformed values to `None`.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(from_value))
}

/// Deserialize a required timestamp, mapping missing or malformed values to epoch 0.
pub fn deserialize_or_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt(deserializer)?.unwrap_or(0))
}
