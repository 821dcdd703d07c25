use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] firecheck_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Asset ID cannot be empty")]
    EmptyAssetId,
    #[error("--lat and --lng must be given together")]
    IncompleteGps,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "No scope selected. Pass --owner, --workspace or --section, set FIRECHECK_OWNER, or run `firecheck config init --owner <ID>`."
    )]
    MissingScope,
    #[error("{0} duplicate record(s) could not be deleted; re-run `firecheck duplicates` to inspect")]
    PartialCleanup(usize),
}
