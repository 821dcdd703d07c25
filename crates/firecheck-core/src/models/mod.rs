//! Data models for firecheck

mod extinguisher;
mod inspection;
mod patch;
mod status;
mod timestamp;

pub use extinguisher::{ExtinguisherRecord, NewRecord, RecordId};
pub use inspection::{GpsFix, InspectionEvent, Photo};
pub use patch::RecordPatch;
pub use status::Status;
pub use timestamp::parse_timestamp;
