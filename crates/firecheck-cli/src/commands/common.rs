use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use firecheck_core::db::Database;
use firecheck_core::models::Photo;
use firecheck_core::reconcile::{CleanupReport, DuplicateGroup};
use firecheck_core::services::Scope;
use firecheck_core::util::normalize_text_option;
use firecheck_core::ExtinguisherRecord;
use serde::Serialize;

use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Global flags that every store-backed command resolves against config
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub db_path: Option<PathBuf>,
    pub profile: Option<String>,
    pub owner: Option<String>,
    pub workspace: Option<String>,
    pub section: Option<String>,
}

/// Database location and scope after flags, environment and profile are layered
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub scope: Scope,
}

#[derive(Debug, Serialize)]
pub struct RecordListItem {
    pub id: String,
    pub asset_id: String,
    pub status: String,
    pub checked_date: Option<i64>,
    pub checked_at: Option<String>,
    pub notes: String,
    pub section: Option<String>,
    pub photos: usize,
    pub main_photo_url: Option<String>,
    pub inspections: usize,
}

#[derive(Debug, Serialize)]
pub struct DuplicateGroupItem {
    pub asset_id: String,
    pub keep: String,
    pub remove: Vec<String>,
}

pub fn resolve_settings(args: GlobalArgs) -> Result<Settings, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(args.profile.as_deref());
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    tracing::debug!(profile = %profile_name, "Resolved CLI profile");

    let env_owner = normalize_text_option(env::var("FIRECHECK_OWNER").ok());
    let scope = resolve_scope(&args, env_owner, &profile).ok_or(CliError::MissingScope)?;
    let db_path = resolve_db_path(args.db_path, &profile)?;
    Ok(Settings { db_path, scope })
}

/// Flags first, then `FIRECHECK_OWNER`, then the profile's owner or workspace
pub fn resolve_scope(
    args: &GlobalArgs,
    env_owner: Option<String>,
    profile: &CliProfile,
) -> Option<Scope> {
    if let Some(owner) = normalize_text_option(args.owner.clone()) {
        return Some(Scope::Owner(owner));
    }
    if let Some(workspace) = normalize_text_option(args.workspace.clone()) {
        return Some(Scope::Workspace(workspace));
    }
    if let Some(section) = normalize_text_option(args.section.clone()) {
        return Some(Scope::Section(section));
    }
    env_owner
        .map(Scope::Owner)
        .or_else(|| profile.owner.clone().map(Scope::Owner))
        .or_else(|| profile.workspace.clone().map(Scope::Workspace))
}

pub fn resolve_db_path(
    cli_db_path: Option<PathBuf>,
    profile: &CliProfile,
) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_db_path
        .or_else(|| env::var_os("FIRECHECK_DB_PATH").map(PathBuf::from))
        .or_else(|| profile.db_path.clone())
    {
        return Ok(path);
    }
    default_db_path()
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("firecheck").join("firecheck.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

pub async fn open_database(db_path: &Path) -> Result<Database, CliError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!(path = %db_path.display(), "Opening database");
    Ok(Database::open(db_path).await?)
}

pub fn normalize_asset_id(asset_id: &str) -> Result<String, CliError> {
    let trimmed = asset_id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyAssetId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn record_to_list_item(record: &ExtinguisherRecord) -> RecordListItem {
    RecordListItem {
        id: record.id.to_string(),
        asset_id: record.asset_id.trim().to_string(),
        status: record.status.to_string(),
        checked_date: record.checked_date,
        checked_at: record.checked_date.map(format_timestamp),
        notes: record.notes.clone(),
        section: record.section.clone(),
        photos: record.photos.len(),
        main_photo_url: record
            .main_photo()
            .and_then(Photo::url)
            .map(str::to_string),
        inspections: record.inspection_history.len(),
    }
}

pub fn format_record_lines(records: &[ExtinguisherRecord]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    records
        .iter()
        .map(|record| {
            let asset = record.asset_key().unwrap_or("(no asset id)");
            let checked = record.checked_date.map_or_else(
                || "never".to_string(),
                |checked| format_relative_time(checked, now_ms),
            );
            let line = format!("{asset:<16}  {:<7}  {checked:<10}", record.status);
            match record.notes.trim() {
                "" => line.trim_end().to_string(),
                notes => format!("{line}  {}", truncate(notes, 40)),
            }
        })
        .collect()
}

pub fn group_to_item(group: &DuplicateGroup) -> DuplicateGroupItem {
    DuplicateGroupItem {
        asset_id: group.asset_id.clone(),
        keep: group.keep.id.to_string(),
        remove: group.remove.iter().map(|record| record.id.to_string()).collect(),
    }
}

pub fn format_group_lines(groups: &[DuplicateGroup]) -> Vec<String> {
    groups
        .iter()
        .map(|group| {
            let remove = group
                .remove
                .iter()
                .map(|record| record.id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{:<16}  keep {}  ({})  remove {}",
                group.asset_id, group.keep.id, group.keep.status, remove
            )
        })
        .collect()
}

pub fn format_report_lines(report: &CleanupReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Merged {} group(s), deleted {} record(s)",
        report.groups_merged, report.records_deleted
    )];
    lines.extend(report.failed_deletions.iter().map(|failure| {
        format!(
            "  could not delete {} (asset {}): {}",
            failure.record_id, failure.asset_id, failure.reason
        )
    }));
    lines
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let mut truncated = collapsed
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
