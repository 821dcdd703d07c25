use firecheck_core::db::LibSqlRecordStore;
use firecheck_core::inspection::InspectionOutcome;
use firecheck_core::models::GpsFix;
use firecheck_core::services::Reconciler;
use firecheck_core::util::normalize_text_option;
use firecheck_core::Status;

use crate::cli::InspectionResult;
use crate::commands::common::{normalize_asset_id, open_database, Settings};
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq)]
pub struct InspectArgs {
    pub result: InspectionResult,
    pub notes: String,
    pub photo_url: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

pub const fn result_status(result: InspectionResult) -> Status {
    match result {
        InspectionResult::Pass => Status::Pass,
        InspectionResult::Fail => Status::Fail,
    }
}

pub fn build_outcome(args: InspectArgs) -> Result<InspectionOutcome, CliError> {
    let mut outcome =
        InspectionOutcome::new(result_status(args.result)).with_notes(args.notes.trim());
    if let Some(url) = normalize_text_option(args.photo_url) {
        outcome = outcome.with_photo(url);
    }
    match (args.lat, args.lng) {
        (Some(latitude), Some(longitude)) => Ok(outcome.with_gps(GpsFix {
            latitude,
            longitude,
            accuracy: None,
        })),
        (None, None) => Ok(outcome),
        _ => Err(CliError::IncompleteGps),
    }
}

pub async fn run_inspect(
    asset_id: &str,
    args: InspectArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let asset_id = normalize_asset_id(asset_id)?;
    let outcome = build_outcome(args)?;

    let db = open_database(&settings.db_path).await?;
    let store = LibSqlRecordStore::new(db.connection());
    let record = Reconciler::new(&store, settings.scope.clone())
        .inspect(&asset_id, &outcome)
        .await?;

    println!("{} {} ({})", record.asset_id.trim(), record.status, record.id);
    Ok(())
}

pub async fn run_reset(asset_id: &str, settings: &Settings) -> Result<(), CliError> {
    let asset_id = normalize_asset_id(asset_id)?;

    let db = open_database(&settings.db_path).await?;
    let store = LibSqlRecordStore::new(db.connection());
    let record = Reconciler::new(&store, settings.scope.clone())
        .reset(&asset_id)
        .await?;

    println!("{} {} ({})", record.asset_id.trim(), record.status, record.id);
    Ok(())
}
