use firecheck_core::db::LibSqlRecordStore;
use firecheck_core::services::Reconciler;

use crate::commands::common::{
    format_record_lines, open_database, record_to_list_item, RecordListItem, Settings,
};
use crate::error::CliError;

pub async fn run_list(dedupe: bool, as_json: bool, settings: &Settings) -> Result<(), CliError> {
    let db = open_database(&settings.db_path).await?;
    let store = LibSqlRecordStore::new(db.connection());
    let reconciler = Reconciler::new(&store, settings.scope.clone());

    let records = if dedupe {
        reconciler.deduped().await?
    } else {
        reconciler.snapshot().await?
    };

    if as_json {
        let json_items = records
            .iter()
            .map(record_to_list_item)
            .collect::<Vec<RecordListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_record_lines(&records) {
            println!("{line}");
        }
    }

    Ok(())
}
