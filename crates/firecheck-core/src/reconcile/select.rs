//! Canonical-record selection

use std::collections::HashMap;

use crate::models::ExtinguisherRecord;

/// Pick which of two records for the same asset should win.
///
/// 1. A completed inspection outranks a pending placeholder.
/// 2. Between two completed records, the later `checked_date` wins.
/// 3. Between two pending records, the later `created_at` wins.
///
/// Exact ties go to `b`. Folding a group left to right therefore keeps the
/// last of several equally ranked records. A missing `checked_date` counts as
/// epoch 0.
pub fn select_preferred<'r>(
    a: &'r ExtinguisherRecord,
    b: &'r ExtinguisherRecord,
) -> &'r ExtinguisherRecord {
    match (a.status.is_pending(), b.status.is_pending()) {
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            if b.checked_date.unwrap_or(0) >= a.checked_date.unwrap_or(0) {
                b
            } else {
                a
            }
        }
        (true, true) => {
            if b.created_at >= a.created_at {
                b
            } else {
                a
            }
        }
    }
}

/// Left fold of [`select_preferred`] over `records`; `None` when empty.
pub fn fold_preferred<'r, I>(records: I) -> Option<&'r ExtinguisherRecord>
where
    I: IntoIterator<Item = &'r ExtinguisherRecord>,
{
    records.into_iter().reduce(select_preferred)
}

/// One winner per distinct non-blank asset id.
///
/// Records whose asset id is blank are left out. Winners come back in the
/// order their asset id first appears in `records`.
pub fn dedupe(records: &[ExtinguisherRecord]) -> Vec<&ExtinguisherRecord> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut winners: Vec<&ExtinguisherRecord> = Vec::new();

    for record in records {
        let Some(key) = record.asset_key() else {
            continue;
        };
        match slots.get(key) {
            Some(&slot) => winners[slot] = select_preferred(winners[slot], record),
            None => {
                slots.insert(key, winners.len());
                winners.push(record);
            }
        }
    }

    winners
}
