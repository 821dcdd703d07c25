pub mod add;
pub mod cleanup;
pub mod common;
pub mod completions;
pub mod config;
pub mod duplicates;
pub mod inspect;
pub mod list;
