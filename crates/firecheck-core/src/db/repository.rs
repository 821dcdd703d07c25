//! libSQL record store

use libsql::{params, Connection, Row, Rows};

use crate::error::{Error, Result};
use crate::models::{ExtinguisherRecord, NewRecord, RecordId, RecordPatch};
use crate::store::{RecordField, RecordStore};

/// libSQL implementation of `RecordStore`
///
/// Documents are stored as JSON and updated with `json_patch`, so keys this
/// crate does not model survive a merge untouched.
pub struct LibSqlRecordStore<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlRecordStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a record verbatim, keeping its id
    pub async fn insert(&self, record: &ExtinguisherRecord) -> Result<()> {
        if record.id.as_str().is_empty() {
            return Err(Error::InvalidInput("Record id must not be empty".into()));
        }
        let document = serde_json::to_string(record)?;

        self.conn
            .execute(
                "INSERT INTO extinguishers (id, asset_id, user_id, workspace_id, section, created_at, document)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    record.id.as_str(),
                    record.asset_id.trim(),
                    record.user_id.as_deref().unwrap_or_default(),
                    record.workspace_id.as_deref().unwrap_or_default(),
                    record.section.as_deref().unwrap_or_default(),
                    record.created_at,
                    document
                ],
            )
            .await?;

        Ok(())
    }

    /// Lock or unlock a record against deletion
    pub async fn set_locked(&self, id: &RecordId, locked: bool) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE extinguishers SET locked = ? WHERE id = ?",
                params![i32::from(locked), id.as_str()],
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Fetch one record by id
    pub async fn get(&self, id: &RecordId) -> Result<Option<ExtinguisherRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, document FROM extinguishers WHERE id = ?",
                [id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_record(&row)?)),
            None => Ok(None),
        }
    }

    /// Parse a record from a `(id, document)` row
    fn parse_record(row: &Row) -> Result<ExtinguisherRecord> {
        let id: String = row.get(0)?;
        let document: String = row.get(1)?;
        let mut record: ExtinguisherRecord = serde_json::from_str(&document)?;
        record.id = RecordId::from(id);
        Ok(record)
    }

    /// Parse every row, skipping documents that are not JSON objects
    async fn collect(mut rows: Rows) -> Result<Vec<ExtinguisherRecord>> {
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            match Self::parse_record(&row) {
                Ok(record) => records.push(record),
                Err(Error::Serialization(error)) => {
                    let id = row.get::<String>(0).unwrap_or_default();
                    tracing::warn!(record_id = %id, "Skipping unreadable record document: {error}");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(records)
    }
}

impl RecordStore for LibSqlRecordStore<'_> {
    async fn query_by_field(
        &self,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<ExtinguisherRecord>> {
        let value = match field {
            RecordField::AssetId => value.trim(),
            _ => value,
        };
        let sql = format!(
            "SELECT id, document FROM extinguishers WHERE {} = ? ORDER BY rowid",
            field.column()
        );
        let rows = self.conn.query(&sql, [value]).await?;
        Self::collect(rows).await
    }

    async fn get_all(&self) -> Result<Vec<ExtinguisherRecord>> {
        let rows = self
            .conn
            .query("SELECT id, document FROM extinguishers ORDER BY rowid", ())
            .await?;
        Self::collect(rows).await
    }

    async fn create(&self, record: NewRecord) -> Result<ExtinguisherRecord> {
        let record = record.into_record();
        self.insert(&record).await?;
        Ok(record)
    }

    async fn merge_update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        let document = patch.to_merge_document()?;

        let rows = self
            .conn
            .execute(
                "UPDATE extinguishers SET document = json_patch(document, ?) WHERE id = ?",
                params![document, id.as_str()],
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        tracing::debug!(record_id = %id, "Merged patch into record");
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let mut rows = self
            .conn
            .query("SELECT locked FROM extinguishers WHERE id = ?", [id.as_str()])
            .await?;

        let Some(row) = rows.next().await? else {
            return Err(Error::NotFound(id.to_string()));
        };
        if row.get::<i32>(0)? != 0 {
            return Err(Error::PermissionDenied(id.to_string()));
        }

        self.conn
            .execute("DELETE FROM extinguishers WHERE id = ?", [id.as_str()])
            .await?;
        Ok(())
    }
}
