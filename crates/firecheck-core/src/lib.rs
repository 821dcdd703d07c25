//! firecheck-core - Core library for firecheck
//!
//! Extinguisher record models, the record store abstraction with libSQL and
//! in-memory implementations, and the duplicate-asset reconciliation engine
//! used by every firecheck client.

pub mod db;
pub mod error;
pub mod inspection;
pub mod models;
pub mod reconcile;
pub mod services;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{ExtinguisherRecord, RecordId, Status};
