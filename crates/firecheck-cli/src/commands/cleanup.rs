use firecheck_core::db::LibSqlRecordStore;
use firecheck_core::services::Reconciler;

use crate::commands::common::{
    format_group_lines, format_report_lines, group_to_item, open_database, DuplicateGroupItem,
    Settings,
};
use crate::error::CliError;

/// Without `confirmed` only the plan is printed and nothing is written.
pub async fn run_cleanup(
    confirmed: bool,
    as_json: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let db = open_database(&settings.db_path).await?;
    let store = LibSqlRecordStore::new(db.connection());
    let reconciler = Reconciler::new(&store, settings.scope.clone());

    if !confirmed {
        let groups = reconciler.detect().await?;
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
            println!("Re-run with --yes to merge and delete.");
        }
        return Ok(());
    }

    let report = reconciler.cleanup().await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_report_lines(&report) {
            println!("{line}");
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::PartialCleanup(report.failed_deletions.len()))
    }
}
