//! Inspection events, photos, and GPS fixes.
//!
//! History entries and photos are written by many client versions, so they
//! are held as the JSON value that was stored and only interpreted through
//! accessors. Merging and writing them back never reformats or drops a key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::Status;
use super::timestamp;

/// One historical inspection result, kept exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionEvent(Value);

impl InspectionEvent {
    /// Event written by this crate
    pub fn new(date: i64, status: &Status, notes: &str, photo_url: Option<&str>) -> Self {
        let mut event = Map::new();
        event.insert("date".to_string(), date.into());
        event.insert("status".to_string(), status.as_str().into());
        event.insert("notes".to_string(), notes.into());
        event.insert(
            "photoUrl".to_string(),
            photo_url.map_or(Value::Null, Into::into),
        );
        Self(Value::Object(event))
    }

    /// Stored JSON for this event
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.0
            .get(key)
            .filter(|value| !value.is_null() && value.as_str() != Some(""))
    }

    /// Does the event carry a date at all, parseable or not?
    pub fn has_date(&self) -> bool {
        self.field("date").is_some()
    }

    /// Event date as Unix ms, when it can be parsed
    pub fn date(&self) -> Option<i64> {
        self.field("date").and_then(timestamp::from_value)
    }

    pub fn status(&self) -> Status {
        self.field("status")
            .map_or(Status::Pending, Status::from_value)
    }

    pub fn notes(&self) -> &str {
        self.0.get("notes").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.field("photoUrl").and_then(Value::as_str)
    }

    /// Identity used when merging histories: `date|status|notes|photoUrl`,
    /// each part taken from the stored value and empty when missing.
    #[must_use]
    pub fn merge_key(&self) -> String {
        ["date", "status", "notes", "photoUrl"]
            .map(|key| key_part(self.0.get(key)))
            .join("|")
    }
}

impl From<Value> for InspectionEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A photo attached to a record, kept exactly as stored.
/// Position 0 in a record's list is the main photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(Value);

impl Photo {
    pub fn new(url: impl Into<String>) -> Self {
        let mut photo = Map::new();
        photo.insert("url".to_string(), Value::String(url.into()));
        Self(Value::Object(photo))
    }

    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.0.get("storagePath").and_then(Value::as_str)
    }

    /// Identity used when merging photo lists: the url, or the whole stored
    /// value for photos without one
    #[must_use]
    pub fn merge_key(&self) -> String {
        self.url()
            .map_or_else(|| self.0.to_string(), str::to_string)
    }
}

impl From<Value> for Photo {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn key_part(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Location captured with the most recent inspection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}
