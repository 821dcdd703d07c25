//! Duplicate asset reconciliation.
//!
//! Several documents can end up sharing one asset id when offline clients
//! write to the shared collection concurrently. Everything here except
//! [`run_cleanup`] is a pure function over a caller-supplied snapshot:
//!
//! * [`select_preferred`] / [`dedupe`] collapse duplicates for display,
//! * [`find_duplicate_groups`] reports what cleanup would merge,
//! * [`merge_histories`], [`merge_photos`], [`choose_latest_non_null`] build
//!   the keeper's merged state,
//! * [`run_cleanup`] writes the merge and then deletes the losers.

mod cleanup;
mod detect;
mod merge;
mod select;

pub use cleanup::{merge_patch, run_cleanup, CleanupReport, DeleteFailure};
pub use detect::{find_duplicate_groups, DuplicateGroup};
pub use merge::{
    choose_latest_non_null, latest_inspection_gps, latest_inspection_photo, merge_histories,
    merge_photos,
};
pub use select::{dedupe, fold_preferred, select_preferred};
