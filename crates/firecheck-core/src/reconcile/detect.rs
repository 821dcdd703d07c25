//! Duplicate-group detection

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ptr;

use serde::Serialize;

use crate::models::ExtinguisherRecord;

use super::select::fold_preferred;

/// Two or more records sharing one asset id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    /// Trimmed asset id shared by every member
    pub asset_id: String,
    /// Record that survives cleanup
    pub keep: ExtinguisherRecord,
    /// Records merged into `keep` and then deleted, in input order
    pub remove: Vec<ExtinguisherRecord>,
}

impl DuplicateGroup {
    /// `keep` followed by every `remove` member
    pub fn members(&self) -> Vec<&ExtinguisherRecord> {
        std::iter::once(&self.keep).chain(&self.remove).collect()
    }
}

/// Find every asset id held by more than one record.
///
/// Blank asset ids never form a group. Groups are sorted by asset id
/// (case-insensitive first, then exact) so output is stable across runs.
pub fn find_duplicate_groups(records: &[ExtinguisherRecord]) -> Vec<DuplicateGroup> {
    let mut order: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, Vec<&ExtinguisherRecord>> = HashMap::new();

    for record in records {
        let Some(key) = record.asset_key() else {
            continue;
        };
        members
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    let mut groups: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|key| {
            let group = members.remove(key)?;
            if group.len() < 2 {
                return None;
            }
            let keep = fold_preferred(group.iter().copied())?;
            let remove = group
                .iter()
                .filter(|member| !ptr::eq(**member, keep))
                .map(|member| (*member).clone())
                .collect();
            Some(DuplicateGroup {
                asset_id: key.to_string(),
                keep: keep.clone(),
                remove,
            })
        })
        .collect();

    groups.sort_by(|a, b| compare_asset_ids(&a.asset_id, &b.asset_id));
    tracing::debug!(groups = groups.len(), "Detected duplicate asset groups");
    groups
}

/// Case-folded order; ids differing only in case put lowercase first
fn compare_asset_ids(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
