//! Inspection status

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Inspection status of an extinguisher slot.
///
/// Stored documents are inconsistent about casing (`"Pass"`, `"PENDING"`), so
/// the known values are matched case-insensitively. Anything else is kept
/// verbatim in [`Status::Other`] and counts as a completed inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Not yet inspected in the current cycle
    #[default]
    Pending,
    /// Passed inspection
    Pass,
    /// Failed inspection
    Fail,
    /// A value written by some other client, e.g. `"Needs Service"`
    Other(String),
}

impl Status {
    /// Classify a stored status string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Status of a raw JSON value; `null` reads as pending
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Pending,
            Value::String(raw) => Self::parse(raw),
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire representation: lowercase for known values, verbatim otherwise
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map_or(Self::Pending, Self::from_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Status::parse("PASS"), Status::Pass);
        assert_eq!(Status::parse(" Pending "), Status::Pending);
        assert_eq!(Status::parse("fAiL"), Status::Fail);
    }

    #[test]
    fn unknown_values_are_kept_and_count_as_completed() {
        let status = Status::parse("Needs Attention");
        assert_eq!(status, Status::Other("Needs Attention".to_string()));
        assert!(!status.is_pending());
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Needs Attention\"");
    }

    #[test]
    fn deserialization_never_fails() {
        let parsed: Status = serde_json::from_str("\"PASS\"").unwrap();
        assert_eq!(parsed, Status::Pass);
        let missing: Status = serde_json::from_str("null").unwrap();
        assert_eq!(missing, Status::Pending);
        let numeric: Status = serde_json::from_str("3").unwrap();
        assert_eq!(numeric, Status::Other("3".to_string()));
    }

    #[test]
    fn serializes_known_values_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Fail).unwrap(), "\"fail\"");
    }
}
