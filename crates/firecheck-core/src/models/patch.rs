//! Partial record updates

use serde::Serialize;

use super::extinguisher::ExtinguisherRecord;
use super::inspection::{GpsFix, InspectionEvent, Photo};
use super::status::Status;

/// Partial update applied with merge semantics.
///
/// `None` leaves a field untouched. For nullable fields, `Some(None)` clears
/// the stored value. Serializes to an RFC 7396 merge-patch document, which is
/// what the libSQL store hands to `json_patch`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_date: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_history: Option<Vec<InspectionEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<Photo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_inspection_photo_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_inspection_gps: Option<Option<GpsFix>>,
}

impl RecordPatch {
    /// True when the patch names no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply in place, touching only the named fields.
    pub fn apply_to(&self, record: &mut ExtinguisherRecord) {
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
        if let Some(checked_date) = self.checked_date {
            record.checked_date = checked_date;
        }
        if let Some(notes) = &self.notes {
            record.notes.clone_from(notes);
        }
        if let Some(history) = &self.inspection_history {
            record.inspection_history.clone_from(history);
        }
        if let Some(photos) = &self.photos {
            record.photos.clone_from(photos);
        }
        if let Some(url) = &self.last_inspection_photo_url {
            record.last_inspection_photo_url.clone_from(url);
        }
        if let Some(gps) = self.last_inspection_gps {
            record.last_inspection_gps = gps;
        }
    }

    /// Merge-patch JSON document for this patch
    pub fn to_merge_document(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
