use firecheck_core::db::LibSqlRecordStore;
use firecheck_core::services::Reconciler;

use crate::commands::common::{
    format_group_lines, group_to_item, open_database, DuplicateGroupItem, Settings,
};
use crate::error::CliError;

pub async fn run_duplicates(as_json: bool, settings: &Settings) -> Result<(), CliError> {
    let db = open_database(&settings.db_path).await?;
    let store = LibSqlRecordStore::new(db.connection());
    let groups = Reconciler::new(&store, settings.scope.clone())
        .detect()
        .await?;

    if as_json {
        let json_items = groups
            .iter()
            .map(group_to_item)
            .collect::<Vec<DuplicateGroupItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if groups.is_empty() {
        println!("No duplicate asset IDs");
    } else {
        for line in format_group_lines(&groups) {
            println!("{line}");
        }
    }

    Ok(())
}
