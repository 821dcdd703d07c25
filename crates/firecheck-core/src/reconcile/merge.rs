//! History and photo merging across duplicate records

use std::collections::HashSet;
use std::ptr;

use crate::models::{ExtinguisherRecord, GpsFix, InspectionEvent, Photo};

/// Combined, chronological, duplicate-free inspection history.
///
/// Events without a date are dropped. Events whose date is present but not
/// understood sort after every dated event, in their original order. The sort
/// is stable, so among events with the same date the earlier record's events
/// come first, and the first occurrence of each `date|status|notes|photoUrl`
/// key is the one kept. Events are returned exactly as stored.
pub fn merge_histories(records: &[&ExtinguisherRecord]) -> Vec<InspectionEvent> {
    let mut events: Vec<&InspectionEvent> = records
        .iter()
        .flat_map(|record| &record.inspection_history)
        .filter(|event| event.has_date())
        .collect();
    events.sort_by_key(|event| event.date().map_or((1, 0), |date| (0, date)));

    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| seen.insert(event.merge_key()))
        .cloned()
        .collect()
}

/// `keep`'s photos in their original order, followed by any photo from the
/// other records whose url is not already present.
pub fn merge_photos(keep: &ExtinguisherRecord, all: &[&ExtinguisherRecord]) -> Vec<Photo> {
    let mut merged = keep.photos.clone();
    let mut seen: HashSet<String> = merged.iter().map(Photo::merge_key).collect();

    for record in all.iter().filter(|record| !is_same_document(record, keep)) {
        for photo in &record.photos {
            if seen.insert(photo.merge_key()) {
                merged.push(photo.clone());
            }
        }
    }

    merged
}

/// Value of `field` from the record with the latest `date_field`.
///
/// Only records where `field` yields a value take part; a missing date counts
/// as epoch 0 and ties go to the later record.
pub fn choose_latest_non_null<'r, T, F, D>(
    records: &[&'r ExtinguisherRecord],
    field: F,
    date_field: D,
) -> Option<&'r T>
where
    T: ?Sized,
    F: Fn(&'r ExtinguisherRecord) -> Option<&'r T>,
    D: Fn(&ExtinguisherRecord) -> Option<i64>,
{
    let mut best: Option<(&'r T, i64)> = None;

    for &record in records {
        let Some(value) = field(record) else {
            continue;
        };
        let date = date_field(record).unwrap_or(0);
        if best.is_some_and(|(_, best_date)| date < best_date) {
            continue;
        }
        best = Some((value, date));
    }

    best.map(|(value, _)| value)
}

/// Most recent non-empty `last_inspection_photo_url`, by `checked_date`.
pub fn latest_inspection_photo<'r>(records: &[&'r ExtinguisherRecord]) -> Option<&'r str> {
    choose_latest_non_null(records, inspection_photo_url, checked_date)
}

/// Most recent `last_inspection_gps`, by `checked_date`.
pub fn latest_inspection_gps<'r>(records: &[&'r ExtinguisherRecord]) -> Option<&'r GpsFix> {
    choose_latest_non_null(records, inspection_gps, checked_date)
}

fn inspection_photo_url(record: &ExtinguisherRecord) -> Option<&str> {
    record
        .last_inspection_photo_url
        .as_deref()
        .filter(|url| !url.is_empty())
}

fn inspection_gps(record: &ExtinguisherRecord) -> Option<&GpsFix> {
    record.last_inspection_gps.as_ref()
}

const fn checked_date(record: &ExtinguisherRecord) -> Option<i64> {
    record.checked_date
}

fn is_same_document(record: &ExtinguisherRecord, keep: &ExtinguisherRecord) -> bool {
    ptr::eq(record, keep) || (!keep.id.as_str().is_empty() && record.id == keep.id)
}
