//! Database layer for firecheck

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::LibSqlRecordStore;
