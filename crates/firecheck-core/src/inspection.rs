//! Inspection recording.
//!
//! Turns an inspection outcome into a [`RecordPatch`] for the record it was
//! performed on. The history entry written here is what the reconciliation
//! merge later folds across duplicates, and `lastInspection*` are what
//! `choose_latest_non_null` picks from.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ExtinguisherRecord, GpsFix, InspectionEvent, RecordPatch, Status};

/// Result of inspecting one extinguisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionOutcome {
    pub status: Status,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub gps: Option<GpsFix>,
}

impl InspectionOutcome {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            notes: String::new(),
            photo_url: None,
            gps: None,
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn with_gps(mut self, gps: GpsFix) -> Self {
        self.gps = Some(gps);
        self
    }
}

/// Build the patch recording `outcome` on `record` at `now` (Unix ms).
pub fn record_inspection(
    record: &ExtinguisherRecord,
    outcome: &InspectionOutcome,
    now: i64,
) -> Result<RecordPatch> {
    if outcome.status.is_pending() {
        return Err(Error::InvalidInput(
            "An inspection must record pass or fail".to_string(),
        ));
    }

    let photo_url = outcome
        .photo_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);

    let mut history = record.inspection_history.clone();
    history.push(InspectionEvent::new(
        now,
        &outcome.status,
        &outcome.notes,
        photo_url.as_deref(),
    ));

    Ok(RecordPatch {
        status: Some(outcome.status.clone()),
        checked_date: Some(Some(now)),
        notes: Some(outcome.notes.clone()),
        inspection_history: Some(history),
        photos: None,
        last_inspection_photo_url: photo_url.map(Some),
        last_inspection_gps: outcome.gps.map(Some),
    })
}

/// Patch returning a record to `pending` for the next inspection cycle.
///
/// History and photos are kept.
pub fn reset_for_new_cycle() -> RecordPatch {
    RecordPatch {
        status: Some(Status::Pending),
        checked_date: Some(None),
        notes: Some(String::new()),
        ..RecordPatch::default()
    }
}
