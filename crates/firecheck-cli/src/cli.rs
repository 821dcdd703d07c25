use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "firecheck")]
#[command(about = "Track fire-extinguisher inspections and reconcile duplicate asset records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Work on records owned by this user
    #[arg(long, global = true, value_name = "USER_ID")]
    pub owner: Option<String>,

    /// Work on records in this workspace
    #[arg(long, global = true, value_name = "ID", conflicts_with = "owner")]
    pub workspace: Option<String>,

    /// Work on records in this section
    #[arg(long, global = true, value_name = "NAME", conflicts_with_all = ["owner", "workspace"])]
    pub section: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new extinguisher
    #[command(alias = "new")]
    Add {
        /// Asset ID as printed on the tag
        asset_id: String,
        /// Notes for the new record
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List extinguishers
    List {
        /// Show one record per asset ID
        #[arg(long)]
        dedupe: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record an inspection result
    Inspect {
        /// Asset ID to inspect
        asset_id: String,
        /// Inspection result
        #[arg(long, value_enum)]
        status: InspectionResult,
        /// Inspection notes
        #[arg(long, default_value = "")]
        notes: String,
        /// URL of the photo taken during inspection
        #[arg(long, value_name = "URL")]
        photo_url: Option<String>,
        /// Latitude of the inspection
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the inspection
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Return an extinguisher to pending for the next cycle
    Reset {
        /// Asset ID to reset
        asset_id: String,
    },
    /// Show asset IDs held by more than one record
    Duplicates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge duplicate records and delete the extras
    Cleanup {
        /// Actually merge and delete; without this only the plan is shown
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum InspectionResult {
    Pass,
    Fail,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Default owner (user ID) for this profile
        #[arg(long = "default-owner", value_name = "USER_ID")]
        owner: Option<String>,
        /// Default workspace for this profile
        #[arg(long = "default-workspace", value_name = "ID")]
        workspace: Option<String>,
        /// Database file for this profile
        #[arg(long = "profile-db-path", value_name = "PATH")]
        db_path: Option<PathBuf>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved configuration
    Show,
}
