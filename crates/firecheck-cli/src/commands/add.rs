use firecheck_core::db::LibSqlRecordStore;
use firecheck_core::models::NewRecord;
use firecheck_core::services::Reconciler;

use crate::commands::common::{normalize_asset_id, open_database, Settings};
use crate::error::CliError;

pub async fn run_add(asset_id: &str, notes: &str, settings: &Settings) -> Result<(), CliError> {
    let asset_id = normalize_asset_id(asset_id)?;

    let db = open_database(&settings.db_path).await?;
    let store = LibSqlRecordStore::new(db.connection());
    let reconciler = Reconciler::new(&store, settings.scope.clone());

    let record = reconciler
        .add(NewRecord {
            notes: notes.trim().to_string(),
            ..NewRecord::new(asset_id)
        })
        .await?;

    println!("{}", record.id);
    Ok(())
}
