//! In-memory record store

use std::collections::HashSet;

use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{ExtinguisherRecord, NewRecord, RecordId, RecordPatch};

use super::{RecordField, RecordStore};

/// Record store backed by a `Vec`, preserving insertion order.
///
/// Ids marked with [`protect`](Self::protect) refuse deletion with
/// `PermissionDenied`, mirroring documents a shared store's rules lock down.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<ExtinguisherRecord>>,
    protected: Mutex<HashSet<RecordId>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing snapshot, ids kept as given
    pub fn from_records(records: Vec<ExtinguisherRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            protected: Mutex::new(HashSet::new()),
        }
    }

    /// Insert a record verbatim
    pub async fn insert(&self, record: ExtinguisherRecord) {
        self.records.lock().await.push(record);
    }

    /// Make `id` undeletable
    pub async fn protect(&self, id: &RecordId) {
        self.protected.lock().await.insert(id.clone());
    }

    /// Fetch one record by id
    pub async fn get(&self, id: &RecordId) -> Option<ExtinguisherRecord> {
        self.records
            .lock()
            .await
            .iter()
            .find(|record| &record.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl RecordStore for InMemoryRecordStore {
    async fn query_by_field(
        &self,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<ExtinguisherRecord>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| field.matches(record, value))
            .cloned()
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<ExtinguisherRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn create(&self, record: NewRecord) -> Result<ExtinguisherRecord> {
        let record = record.into_record();
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn merge_update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        patch.apply_to(record);
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        if self.protected.lock().await.contains(id) {
            return Err(Error::PermissionDenied(id.to_string()));
        }

        let mut records = self.records.lock().await;
        let position = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        records.remove(position);
        Ok(())
    }
}
