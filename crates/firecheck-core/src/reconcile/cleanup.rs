//! Duplicate cleanup: merge each group into its keeper, then delete the rest.

use serde::Serialize;

use crate::error::Result;
use crate::models::{RecordId, RecordPatch};
use crate::store::RecordStore;

use super::detect::DuplicateGroup;
use super::merge::{latest_inspection_gps, latest_inspection_photo, merge_histories, merge_photos};

/// A duplicate that could not be deleted after its data was merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFailure {
    pub record_id: RecordId,
    pub asset_id: String,
    pub reason: String,
}

/// Outcome of one cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub groups_merged: usize,
    pub records_deleted: usize,
    pub failed_deletions: Vec<DeleteFailure>,
}

impl CleanupReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed_deletions.is_empty()
    }
}

/// Patch that folds every member of `group` into `group.keep`.
///
/// Always names `photos` and `inspectionHistory`. `lastInspectionPhotoUrl`
/// and `lastInspectionGps` are named only when some member carries a value;
/// otherwise the keeper's stored value stays as it is. Everything else on the
/// keeper is left alone.
pub fn merge_patch(group: &DuplicateGroup) -> RecordPatch {
    let keep = &group.keep;
    let members = group.members();

    RecordPatch {
        inspection_history: Some(merge_histories(&members)),
        photos: Some(merge_photos(keep, &members)),
        last_inspection_photo_url: latest_inspection_photo(&members)
            .map(|url| Some(url.to_string())),
        last_inspection_gps: latest_inspection_gps(&members).map(|gps| Some(*gps)),
        ..RecordPatch::default()
    }
}

/// Merge and delete every group, one group at a time.
///
/// A group's duplicates are only deleted once the merge into its keeper has
/// been written. Delete failures are logged and collected in the report;
/// a failed merge write stops the run and is returned as the error, leaving
/// earlier groups committed.
pub async fn run_cleanup<S: RecordStore>(
    store: &S,
    groups: &[DuplicateGroup],
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for group in groups {
        let patch = merge_patch(group);
        tracing::debug!(
            asset_id = %group.asset_id,
            keep = %group.keep.id,
            duplicates = group.remove.len(),
            "Merging duplicate group"
        );

        store.merge_update(&group.keep.id, &patch).await?;
        report.groups_merged += 1;

        for duplicate in &group.remove {
            match store.delete(&duplicate.id).await {
                Ok(()) => report.records_deleted += 1,
                Err(error) => {
                    tracing::warn!(
                        record_id = %duplicate.id,
                        asset_id = %group.asset_id,
                        "Failed to delete merged duplicate: {error}"
                    );
                    report.failed_deletions.push(DeleteFailure {
                        record_id: duplicate.id.clone(),
                        asset_id: group.asset_id.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        groups = report.groups_merged,
        deleted = report.records_deleted,
        failed = report.failed_deletions.len(),
        "Duplicate cleanup finished"
    );
    Ok(report)
}
