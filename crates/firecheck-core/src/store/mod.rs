//! Record store abstraction.
//!
//! The reconciliation engine only ever talks to a [`RecordStore`]. The libSQL
//! implementation lives in [`crate::db`]; [`InMemoryRecordStore`] holds an
//! explicit snapshot and is what tests and dry runs use.

mod memory;

pub use memory::InMemoryRecordStore;

use crate::error::{Error, Result};
use crate::models::{ExtinguisherRecord, NewRecord, RecordId, RecordPatch};

/// Indexed record fields that can be queried by exact value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// Compared after trimming both sides
    AssetId,
    UserId,
    WorkspaceId,
    Section,
}

impl RecordField {
    /// Column name used by the SQL store
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::AssetId => "asset_id",
            Self::UserId => "user_id",
            Self::WorkspaceId => "workspace_id",
            Self::Section => "section",
        }
    }

    /// Does `record` hold `value` in this field?
    #[must_use]
    pub fn matches(self, record: &ExtinguisherRecord, value: &str) -> bool {
        match self {
            Self::AssetId => record.asset_id.trim() == value.trim(),
            Self::UserId => record.user_id.as_deref() == Some(value),
            Self::WorkspaceId => record.workspace_id.as_deref() == Some(value),
            Self::Section => record.section.as_deref() == Some(value),
        }
    }
}

/// Trait for extinguisher record storage (async)
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Every record owned by `owner_id`
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<ExtinguisherRecord>> {
        self.query_by_field(RecordField::UserId, owner_id).await
    }

    /// Records whose `field` equals `value`
    async fn query_by_field(&self, field: RecordField, value: &str)
        -> Result<Vec<ExtinguisherRecord>>;

    /// Every record in the store
    async fn get_all(&self) -> Result<Vec<ExtinguisherRecord>>;

    /// Create a pending record with a store-assigned id
    async fn create(&self, record: NewRecord) -> Result<ExtinguisherRecord>;

    /// Overwrite only the fields named by `patch`
    async fn merge_update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()>;

    /// Remove a record; fails with `NotFound` or `PermissionDenied`
    async fn delete(&self, id: &RecordId) -> Result<()>;

    /// Best-effort delete of every id; returns the ones that failed
    async fn batch_delete(&self, ids: &[RecordId]) -> Vec<(RecordId, Error)> {
        let mut failures = Vec::new();
        for id in ids {
            if let Err(error) = self.delete(id).await {
                failures.push((id.clone(), error));
            }
        }
        failures
    }
}
