//! Extinguisher record model

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::inspection::{GpsFix, InspectionEvent, Photo};
use super::status::Status;
use super::timestamp;
use crate::util::now_millis;

/// Store-assigned document identifier.
///
/// Stable per document, not per physical asset: duplicates of one asset carry
/// different ids. Stores bundled with this crate mint UUID v7 strings, but any
/// opaque string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a new time-sortable identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored document for a physical (or logical) extinguisher slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtinguisherRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: RecordId,
    /// Scanned/typed asset identifier; the logical identity key, not unique in storage
    #[serde(default, deserialize_with = "lenient_string")]
    pub asset_id: String,
    #[serde(default)]
    pub status: Status,
    /// When the current status was set (Unix ms); `None` while pending
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub checked_date: Option<i64>,
    /// Document creation time (Unix ms)
    #[serde(default, deserialize_with = "timestamp::deserialize_or_epoch")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub inspection_history: Vec<InspectionEvent>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub photos: Vec<Photo>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub last_inspection_photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub last_inspection_gps: Option<GpsFix>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub workspace_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub section: Option<String>,
}

impl ExtinguisherRecord {
    /// Trimmed asset id, or `None` when it is blank and the record cannot take part in grouping.
    #[must_use]
    pub fn asset_key(&self) -> Option<&str> {
        let key = self.asset_id.trim();
        (!key.is_empty()).then_some(key)
    }

    /// Main photo, if any
    #[must_use]
    pub fn main_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }
}

/// Input for creating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub asset_id: String,
    pub user_id: Option<String>,
    pub workspace_id: Option<String>,
    pub section: Option<String>,
    pub notes: String,
}

impl NewRecord {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_owner(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Materialize a pending record with a fresh id and `created_at = now`.
    #[must_use]
    pub fn into_record(self) -> ExtinguisherRecord {
        ExtinguisherRecord {
            id: RecordId::generate(),
            asset_id: self.asset_id.trim().to_string(),
            status: Status::Pending,
            checked_date: None,
            created_at: now_millis(),
            notes: self.notes,
            inspection_history: Vec::new(),
            photos: Vec::new(),
            last_inspection_photo_url: None,
            last_inspection_gps: None,
            workspace_id: self.workspace_id,
            user_id: self.user_id,
            section: self.section,
        }
    }
}

/// Accept only arrays, keeping every element as stored. Anything else is an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<Value>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().map(T::from).collect())
}

fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Asset ids are sometimes typed in as numbers by spreadsheet imports.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(RecordId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_id_generate_unique() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn asset_key_trims_and_rejects_blank() {
        let mut record = ExtinguisherRecord {
            asset_id: "  100 ".to_string(),
            ..ExtinguisherRecord::default()
        };
        assert_eq!(record.asset_key(), Some("100"));

        record.asset_id = "   ".to_string();
        assert_eq!(record.asset_key(), None);
    }

    #[test]
    fn deserializes_camel_case_document() {
        let json = r#"{
            "id": "doc-1",
            "assetId": "100",
            "status": "Pass",
            "checkedDate": 2000,
            "createdAt": "2024-01-01",
            "notes": "ok",
            "inspectionHistory": [{"date": 2000, "status": "pass", "notes": "ok"}],
            "photos": [{"url": "https://img/1.jpg", "storagePath": "p/1.jpg"}],
            "lastInspectionGps": {"latitude": 1.5, "longitude": -2.0},
            "userId": "u1",
            "section": "B"
        }"#;
        let record: ExtinguisherRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::from("doc-1"));
        assert_eq!(record.status, Status::Pass);
        assert_eq!(record.created_at, 1_704_067_200_000);
        assert_eq!(record.inspection_history.len(), 1);
        assert_eq!(record.photos[0].storage_path(), Some("p/1.jpg"));
        assert_eq!(record.inspection_history[0].date(), Some(2000));
        assert_eq!(
            record.last_inspection_gps,
            Some(GpsFix {
                latitude: 1.5,
                longitude: -2.0,
                accuracy: None
            })
        );
        assert_eq!(record.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn malformed_collections_become_empty() {
        let json = r#"{
            "assetId": 300,
            "inspectionHistory": "oops",
            "photos": null,
            "lastInspectionGps": "somewhere"
        }"#;
        let record: ExtinguisherRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.asset_id, "300");
        assert!(record.inspection_history.is_empty());
        assert!(record.photos.is_empty());
        assert_eq!(record.last_inspection_gps, None);
        assert_eq!(record.created_at, 0);
        assert_eq!(record.status, Status::Pending);
    }

    #[test]
    fn odd_list_elements_are_kept_as_stored() {
        let json = r#"{
            "status": "Needs Attention",
            "inspectionHistory": [
                {"date": "03/01/2024", "status": "Needs Service", "inspector": "Kim"},
                {"notes": "undated"}
            ],
            "photos": [{"url": "a"}, 17, {"nope": true}, {"url": "b"}]
        }"#;
        let record: ExtinguisherRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, Status::Other("Needs Attention".to_string()));
        assert_eq!(record.photos.len(), 4);
        assert_eq!(record.photos[1].as_value(), &serde_json::json!(17));
        assert_eq!(record.inspection_history.len(), 2);

        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["status"], "Needs Attention");
        assert_eq!(written["inspectionHistory"][0]["date"], "03/01/2024");
        assert_eq!(written["inspectionHistory"][0]["inspector"], "Kim");
        assert_eq!(written["photos"][2]["nope"], true);
    }

    #[test]
    fn mistyped_scope_fields_do_not_fail_the_document() {
        let json = r#"{"id": 7, "assetId": "FE-1", "userId": 12, "section": ["B"]}"#;
        let record: ExtinguisherRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::from("7"));
        assert_eq!(record.user_id, None);
        assert_eq!(record.section, None);
    }

    #[test]
    fn new_record_is_pending() {
        let record = NewRecord::new(" 42 ")
            .with_owner("u1")
            .with_section("Lobby")
            .into_record();
        assert_eq!(record.asset_id, "42");
        assert_eq!(record.status, Status::Pending);
        assert_eq!(record.checked_date, None);
        assert!(record.created_at > 0);
        assert_eq!(record.section.as_deref(), Some("Lobby"));
    }
}
