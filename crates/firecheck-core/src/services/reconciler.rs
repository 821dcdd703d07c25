//! Store-backed reconciliation service used by clients.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::inspection::{record_inspection, reset_for_new_cycle, InspectionOutcome};
use crate::models::{ExtinguisherRecord, NewRecord, RecordPatch};
use crate::reconcile::{dedupe, find_duplicate_groups, fold_preferred, run_cleanup};
use crate::reconcile::{CleanupReport, DuplicateGroup};
use crate::store::{RecordField, RecordStore};
use crate::util::now_millis;

/// Partition of the store a reconciler works on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Scope {
    Owner(String),
    Workspace(String),
    Section(String),
}

impl Scope {
    const fn field(&self) -> RecordField {
        match self {
            Self::Owner(_) => RecordField::UserId,
            Self::Workspace(_) => RecordField::WorkspaceId,
            Self::Section(_) => RecordField::Section,
        }
    }

    fn value(&self) -> &str {
        match self {
            Self::Owner(value) | Self::Workspace(value) | Self::Section(value) => value,
        }
    }

    /// Does `record` fall inside this scope?
    pub fn contains(&self, record: &ExtinguisherRecord) -> bool {
        self.field().matches(record, self.value())
    }

    /// Stamp the scope key onto a new record when it has none
    fn fill(&self, mut record: NewRecord) -> NewRecord {
        match self {
            Self::Owner(owner) => {
                record.user_id.get_or_insert_with(|| owner.clone());
            }
            Self::Workspace(workspace) => {
                record.workspace_id.get_or_insert_with(|| workspace.clone());
            }
            Self::Section(section) => {
                record.section.get_or_insert_with(|| section.clone());
            }
        }
        record
    }
}

/// Reconciliation over one scope of a record store.
///
/// Holds no state between calls: every operation reads a fresh snapshot.
pub struct Reconciler<'s, S> {
    store: &'s S,
    scope: Scope,
}

impl<'s, S: RecordStore> Reconciler<'s, S> {
    pub const fn new(store: &'s S, scope: Scope) -> Self {
        Self { store, scope }
    }

    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Every record in scope
    pub async fn snapshot(&self) -> Result<Vec<ExtinguisherRecord>> {
        let records = self
            .store
            .query_by_field(self.scope.field(), self.scope.value())
            .await?;
        tracing::debug!(scope = ?self.scope, records = records.len(), "Loaded snapshot");
        Ok(records)
    }

    /// One record per asset id, plus every record without an asset id
    pub async fn deduped(&self) -> Result<Vec<ExtinguisherRecord>> {
        let records = self.snapshot().await?;
        let mut view: Vec<ExtinguisherRecord> =
            dedupe(&records).into_iter().cloned().collect();
        view.extend(
            records
                .iter()
                .filter(|record| record.asset_key().is_none())
                .cloned(),
        );
        Ok(view)
    }

    /// Duplicate groups in the current snapshot
    pub async fn detect(&self) -> Result<Vec<DuplicateGroup>> {
        Ok(find_duplicate_groups(&self.snapshot().await?))
    }

    /// Detect against a fresh snapshot and clean up every group found
    pub async fn cleanup(&self) -> Result<CleanupReport> {
        let groups = self.detect().await?;
        if groups.is_empty() {
            tracing::info!("No duplicate assets found");
            return Ok(CleanupReport::default());
        }
        run_cleanup(self.store, &groups).await
    }

    /// Create a record unless the asset id is already taken in scope
    pub async fn add(&self, record: NewRecord) -> Result<ExtinguisherRecord> {
        let record = self.scope.fill(record);
        let asset_id = record.asset_id.trim().to_string();
        if asset_id.is_empty() {
            return Err(Error::InvalidInput("Asset ID cannot be empty".into()));
        }
        if self.preferred(&asset_id).await?.is_some() {
            return Err(Error::AlreadyExists(asset_id));
        }
        self.store.create(record).await
    }

    /// Record an inspection on the preferred record for `asset_id`
    pub async fn inspect(
        &self,
        asset_id: &str,
        outcome: &InspectionOutcome,
    ) -> Result<ExtinguisherRecord> {
        let record = self.require_preferred(asset_id).await?;
        let now = now_millis();
        let patch = record_inspection(&record, outcome, now)?;
        self.apply(record, &patch).await
    }

    /// Return the preferred record for `asset_id` to pending
    pub async fn reset(&self, asset_id: &str) -> Result<ExtinguisherRecord> {
        let record = self.require_preferred(asset_id).await?;
        self.apply(record, &reset_for_new_cycle()).await
    }

    async fn apply(
        &self,
        mut record: ExtinguisherRecord,
        patch: &RecordPatch,
    ) -> Result<ExtinguisherRecord> {
        self.store.merge_update(&record.id, patch).await?;
        patch.apply_to(&mut record);
        Ok(record)
    }

    async fn require_preferred(&self, asset_id: &str) -> Result<ExtinguisherRecord> {
        self.preferred(asset_id)
            .await?
            .ok_or_else(|| Error::NotFound(asset_id.trim().to_string()))
    }

    /// Record that currently represents `asset_id` in scope
    async fn preferred(&self, asset_id: &str) -> Result<Option<ExtinguisherRecord>> {
        let candidates: Vec<ExtinguisherRecord> = self
            .store
            .query_by_field(RecordField::AssetId, asset_id)
            .await?
            .into_iter()
            .filter(|record| self.scope.contains(record))
            .collect();
        Ok(fold_preferred(&candidates).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, LibSqlRecordStore};
    use crate::models::{Photo, RecordId, Status};
    use crate::store::InMemoryRecordStore;
    use pretty_assertions::assert_eq;

    fn record(id: &str, asset_id: &str, owner: &str) -> ExtinguisherRecord {
        ExtinguisherRecord {
            id: RecordId::from(id),
            asset_id: asset_id.to_string(),
            user_id: Some(owner.to_string()),
            created_at: 1,
            ..ExtinguisherRecord::default()
        }
    }

    fn owner(name: &str) -> Scope {
        Scope::Owner(name.to_string())
    }

    #[tokio::test]
    async fn deduped_view_passes_blank_assets_through() {
        let store = InMemoryRecordStore::from_records(vec![
            record("1", "100", "u1"),
            record("2", "", "u1"),
            record("3", "100", "u1"),
            record("4", "  ", "u1"),
            record("5", "100", "u2"),
        ]);
        let reconciler = Reconciler::new(&store, owner("u1"));

        let view = reconciler.deduped().await.unwrap();
        let ids: Vec<&str> = view.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "4"]);
    }

    #[tokio::test]
    async fn detection_is_scoped() {
        let store = InMemoryRecordStore::from_records(vec![
            record("1", "100", "u1"),
            record("2", "100", "u2"),
        ]);

        assert!(Reconciler::new(&store, owner("u1")).detect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cleanup_then_detect_is_empty() {
        let mut a = record("a", "100", "u1");
        a.photos = vec![Photo::new("a.jpg")];
        let store = InMemoryRecordStore::from_records(vec![
            a,
            record("b", "100", "u1"),
            record("c", "200", "u1"),
        ]);
        let reconciler = Reconciler::new(&store, owner("u1"));

        let report = reconciler.cleanup().await.unwrap();
        assert_eq!(report.records_deleted, 1);
        assert!(reconciler.detect().await.unwrap().is_empty());

        let kept = store.get(&RecordId::from("b")).await.unwrap();
        assert_eq!(kept.photos, vec![Photo::new("a.jpg")]);
    }

    #[tokio::test]
    async fn cleanup_with_nothing_to_do() {
        let store = InMemoryRecordStore::from_records(vec![record("a", "1", "u1")]);
        let report = Reconciler::new(&store, owner("u1")).cleanup().await.unwrap();
        assert_eq!(report, CleanupReport::default());
    }

    #[tokio::test]
    async fn add_fills_scope_and_rejects_existing_asset() {
        let store = InMemoryRecordStore::new();
        let reconciler = Reconciler::new(&store, Scope::Section("Lobby".to_string()));

        let created = reconciler.add(NewRecord::new("100")).await.unwrap();
        assert_eq!(created.section.as_deref(), Some("Lobby"));

        let again = reconciler.add(NewRecord::new(" 100 ")).await;
        assert!(matches!(again, Err(Error::AlreadyExists(id)) if id == "100"));

        let blank = reconciler.add(NewRecord::new("  ")).await;
        assert!(matches!(blank, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn inspect_updates_the_preferred_duplicate() {
        let mut checked = record("checked", "100", "u1");
        checked.status = Status::Pass;
        checked.checked_date = Some(10);
        let store = InMemoryRecordStore::from_records(vec![
            checked,
            record("placeholder", "100", "u1"),
        ]);
        let reconciler = Reconciler::new(&store, owner("u1"));

        let outcome = InspectionOutcome::new(Status::Fail).with_notes("pin missing");
        let updated = reconciler.inspect("100", &outcome).await.unwrap();

        assert_eq!(updated.id.as_str(), "checked");
        let stored = store.get(&RecordId::from("checked")).await.unwrap();
        assert_eq!(stored.status, Status::Fail);
        assert_eq!(stored.notes, "pin missing");
        assert_eq!(stored.inspection_history.len(), 1);
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn inspect_unknown_asset_is_not_found() {
        let store = InMemoryRecordStore::from_records(vec![record("a", "100", "u2")]);
        let reconciler = Reconciler::new(&store, owner("u1"));

        let result = reconciler
            .inspect("100", &InspectionOutcome::new(Status::Pass))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn reset_returns_to_pending() {
        let mut checked = record("a", "100", "u1");
        checked.status = Status::Pass;
        checked.checked_date = Some(10);
        let store = InMemoryRecordStore::from_records(vec![checked]);

        let reset = Reconciler::new(&store, owner("u1")).reset("100").await.unwrap();
        assert_eq!(reset.status, Status::Pending);
        assert_eq!(reset.checked_date, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn libsql_cleanup_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        let store = LibSqlRecordStore::new(db.connection());
        let mut x = record("x", "300", "u1");
        x.photos = vec![Photo::new("a")];
        let mut y = record("y", "300", "u1");
        y.status = Status::Pass;
        y.checked_date = Some(5);
        y.photos = vec![Photo::new("b")];
        store.insert(&x).await.unwrap();
        store.insert(&y).await.unwrap();
        store.insert(&record("z", "300", "u1")).await.unwrap();
        store.set_locked(&RecordId::from("z"), true).await.unwrap();

        let reconciler = Reconciler::new(&store, owner("u1"));
        let report = reconciler.cleanup().await.unwrap();

        assert_eq!(report.records_deleted, 1);
        assert_eq!(report.failed_deletions.len(), 1);
        assert_eq!(report.failed_deletions[0].record_id.as_str(), "z");

        let kept = store.get(&RecordId::from("y")).await.unwrap().unwrap();
        let urls: Vec<&str> = kept.photos.iter().filter_map(Photo::url).collect();
        assert_eq!(urls, vec!["b", "a"]);
        assert_eq!(kept.status, Status::Pass);
    }
}
