use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use firecheck_core::db::{Database, LibSqlRecordStore};
use firecheck_core::models::Photo;
use firecheck_core::reconcile::find_duplicate_groups;
use firecheck_core::services::Scope;
use firecheck_core::store::{RecordField, RecordStore};
use firecheck_core::{ExtinguisherRecord, RecordId, Status};
use pretty_assertions::assert_eq;

use crate::cli::{CompletionShell, InspectionResult};
use crate::commands::add::run_add;
use crate::commands::cleanup::run_cleanup;
use crate::commands::common::{
    format_group_lines, format_record_lines, format_relative_time, format_timestamp,
    normalize_asset_id, record_to_list_item, resolve_db_path, resolve_scope, GlobalArgs, Settings,
};
use crate::commands::completions::run_completions;
use crate::commands::inspect::{build_outcome, run_inspect, run_reset, InspectArgs};
use crate::config_profiles::CliProfile;
use crate::error::CliError;

#[test]
fn normalize_asset_id_trims_and_rejects_empty() {
    assert_eq!(normalize_asset_id("  FE-100 ").unwrap(), "FE-100");
    assert!(matches!(normalize_asset_id(" \t "), Err(CliError::EmptyAssetId)));
}

#[test]
fn format_relative_time_uses_expected_buckets() {
    let now = 1_700_000_000_000_i64;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 5 * 60_000, now), "5m ago");
    assert_eq!(format_relative_time(now - 3 * 3_600_000, now), "3h ago");
    assert_eq!(format_relative_time(now - 2 * 86_400_000, now), "2d ago");
    assert_eq!(format_relative_time(now - 400 * 86_400_000, now), "1y ago");
}

#[test]
fn format_timestamp_renders_utc() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn scope_flags_win_over_environment_and_profile() {
    let profile = CliProfile {
        owner: Some("profile-owner".to_string()),
        workspace: Some("profile-ws".to_string()),
        db_path: None,
    };
    let args = GlobalArgs {
        section: Some(" Lobby ".to_string()),
        ..GlobalArgs::default()
    };

    assert_eq!(
        resolve_scope(&args, Some("env-owner".to_string()), &profile),
        Some(Scope::Section("Lobby".to_string()))
    );
    assert_eq!(
        resolve_scope(&GlobalArgs::default(), Some("env-owner".to_string()), &profile),
        Some(Scope::Owner("env-owner".to_string()))
    );
    assert_eq!(
        resolve_scope(&GlobalArgs::default(), None, &profile),
        Some(Scope::Owner("profile-owner".to_string()))
    );
}

#[test]
fn profile_workspace_is_the_last_scope_fallback() {
    let profile = CliProfile {
        workspace: Some("site-a".to_string()),
        ..CliProfile::default()
    };
    assert_eq!(
        resolve_scope(&GlobalArgs::default(), None, &profile),
        Some(Scope::Workspace("site-a".to_string()))
    );
    assert_eq!(
        resolve_scope(&GlobalArgs::default(), None, &CliProfile::default()),
        None
    );
}

#[test]
fn explicit_db_path_wins_over_profile() {
    let profile = CliProfile {
        db_path: Some(PathBuf::from("/profile/site.db")),
        ..CliProfile::default()
    };
    let resolved = resolve_db_path(Some(PathBuf::from("/flag/site.db")), &profile).unwrap();
    assert_eq!(resolved, PathBuf::from("/flag/site.db"));
}

#[test]
fn build_outcome_requires_both_coordinates() {
    let args = InspectArgs {
        result: InspectionResult::Pass,
        notes: String::new(),
        photo_url: None,
        lat: Some(51.5),
        lng: None,
    };
    assert!(matches!(build_outcome(args), Err(CliError::IncompleteGps)));
}

#[test]
fn build_outcome_ignores_blank_photo() {
    let args = InspectArgs {
        result: InspectionResult::Fail,
        notes: " gauge low ".to_string(),
        photo_url: Some("  ".to_string()),
        lat: Some(51.5),
        lng: Some(-0.12),
    };
    let outcome = build_outcome(args).unwrap();
    assert_eq!(outcome.status, Status::Fail);
    assert_eq!(outcome.notes, "gauge low");
    assert_eq!(outcome.photo_url, None);
    assert_eq!(outcome.gps.map(|gps| gps.longitude), Some(-0.12));
}

#[test]
fn record_lines_and_items_describe_each_record() {
    let record = ExtinguisherRecord {
        id: RecordId::from("rec-1"),
        asset_id: " FE-7 ".to_string(),
        status: Status::Pass,
        checked_date: Some(0),
        notes: "mounted\nby door".to_string(),
        photos: vec![Photo::new("https://cdn.example.com/fe7.jpg")],
        ..ExtinguisherRecord::default()
    };

    let item = record_to_list_item(&record);
    assert_eq!(item.asset_id, "FE-7");
    assert_eq!(item.status, "pass");
    assert_eq!(item.checked_at.as_deref(), Some("1970-01-01 00:00:00 UTC"));
    assert_eq!(
        item.main_photo_url.as_deref(),
        Some("https://cdn.example.com/fe7.jpg")
    );

    let lines = format_record_lines(std::slice::from_ref(&record));
    assert!(lines[0].starts_with("FE-7"));
    assert!(lines[0].contains("pass"));
    assert!(lines[0].ends_with("mounted by door"));
}

#[test]
fn group_lines_name_keeper_and_duplicates() {
    let records = vec![
        ExtinguisherRecord {
            id: RecordId::from("old"),
            asset_id: "FE-1".to_string(),
            ..ExtinguisherRecord::default()
        },
        ExtinguisherRecord {
            id: RecordId::from("new"),
            asset_id: "FE-1".to_string(),
            status: Status::Pass,
            checked_date: Some(5),
            ..ExtinguisherRecord::default()
        },
    ];
    let lines = format_group_lines(&find_duplicate_groups(&records));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("keep new"));
    assert!(lines[0].ends_with("remove old"));
}

#[tokio::test(flavor = "current_thread")]
async fn add_rejects_asset_already_in_scope() {
    let settings = test_settings();

    run_add("FE-100", "", &settings).await.unwrap();
    let again = run_add(" FE-100 ", "", &settings).await;
    assert!(matches!(
        again,
        Err(CliError::Core(firecheck_core::Error::AlreadyExists(_)))
    ));

    let records = scoped_records(&settings).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id.as_deref(), Some("inspector"));
}

#[tokio::test(flavor = "current_thread")]
async fn inspect_then_reset_round_trip() {
    let settings = test_settings();
    run_add("FE-200", "", &settings).await.unwrap();

    let args = InspectArgs {
        result: InspectionResult::Pass,
        notes: "ok".to_string(),
        photo_url: Some("https://cdn.example.com/a.jpg".to_string()),
        lat: None,
        lng: None,
    };
    run_inspect("FE-200", args, &settings).await.unwrap();

    let inspected = scoped_records(&settings).await.remove(0);
    assert_eq!(inspected.status, Status::Pass);
    assert!(inspected.checked_date.is_some());
    assert_eq!(inspected.inspection_history.len(), 1);
    assert_eq!(
        inspected.last_inspection_photo_url.as_deref(),
        Some("https://cdn.example.com/a.jpg")
    );

    run_reset("FE-200", &settings).await.unwrap();
    let reset = scoped_records(&settings).await.remove(0);
    assert_eq!(reset.status, Status::Pending);
    assert_eq!(reset.checked_date, None);
    assert_eq!(reset.inspection_history.len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn inspect_unknown_asset_fails() {
    let settings = test_settings();
    let args = InspectArgs {
        result: InspectionResult::Fail,
        notes: String::new(),
        photo_url: None,
        lat: None,
        lng: None,
    };
    let result = run_inspect("missing", args, &settings).await;
    assert!(matches!(
        result,
        Err(CliError::Core(firecheck_core::Error::NotFound(_)))
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn cleanup_without_confirmation_changes_nothing() {
    let settings = test_settings();
    seed(&settings, &[("a", "FE-1"), ("b", "FE-1")]).await;

    run_cleanup(false, false, &settings).await.unwrap();

    assert_eq!(scoped_records(&settings).await.len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn confirmed_cleanup_merges_and_deletes() {
    let settings = test_settings();
    seed(&settings, &[("a", "FE-1"), ("b", "FE-1"), ("c", "FE-2")]).await;

    run_cleanup(true, true, &settings).await.unwrap();

    let remaining = scoped_records(&settings).await;
    let ids: Vec<&str> = remaining.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
    let kept = &remaining[0];
    assert_eq!(kept.photos.len(), 2);
    assert_eq!(kept.photos[0].url(), Some("b.jpg"));
}

#[tokio::test(flavor = "current_thread")]
async fn cleanup_reports_locked_duplicates() {
    let settings = test_settings();
    seed(&settings, &[("a", "FE-1"), ("b", "FE-1")]).await;
    {
        let db = Database::open(&settings.db_path).await.unwrap();
        LibSqlRecordStore::new(db.connection())
            .set_locked(&RecordId::from("a"), true)
            .await
            .unwrap();
    }

    let result = run_cleanup(true, false, &settings).await;
    assert!(matches!(result, Err(CliError::PartialCleanup(1))));
    assert_eq!(scoped_records(&settings).await.len(), 2);
}

#[test]
fn completions_are_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("firecheck.bash");

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("firecheck"));
    assert!(script.contains("duplicates"));
}

async fn seed(settings: &Settings, records: &[(&str, &str)]) {
    let db = Database::open(&settings.db_path).await.unwrap();
    let store = LibSqlRecordStore::new(db.connection());
    for (id, asset_id) in records {
        store
            .insert(&ExtinguisherRecord {
                id: RecordId::from(*id),
                asset_id: (*asset_id).to_string(),
                user_id: Some("inspector".to_string()),
                created_at: 1,
                photos: vec![Photo::new(format!("{id}.jpg"))],
                ..ExtinguisherRecord::default()
            })
            .await
            .unwrap();
    }
}

async fn scoped_records(settings: &Settings) -> Vec<ExtinguisherRecord> {
    let db = Database::open(&settings.db_path).await.unwrap();
    LibSqlRecordStore::new(db.connection())
        .query_by_field(RecordField::UserId, "inspector")
        .await
        .unwrap()
}

fn test_settings() -> Settings {
    Settings {
        db_path: unique_test_db_path(),
        scope: Scope::Owner("inspector".to_string()),
    }
}

fn unique_test_db_path() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    let sequence = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("firecheck-cli-test-{timestamp}-{sequence}.db"))
}
