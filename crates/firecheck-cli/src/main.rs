//! firecheck - fire-extinguisher inspection tracker

mod cli;
mod commands;
mod config_profiles;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::cleanup::run_cleanup;
use crate::commands::common::{resolve_settings, GlobalArgs};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::duplicates::run_duplicates;
use crate::commands::inspect::{run_inspect, run_reset, InspectArgs};
use crate::commands::list::run_list;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("firecheck=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = GlobalArgs {
        db_path: cli.db_path,
        profile: cli.profile,
        owner: cli.owner,
        workspace: cli.workspace,
        section: cli.section,
    };

    match cli.command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
        Commands::Config { command } => run_config(command, global)?,
        Commands::Add { asset_id, notes } => {
            run_add(&asset_id, &notes, &resolve_settings(global)?).await?;
        }
        Commands::List { dedupe, json } => {
            run_list(dedupe, json, &resolve_settings(global)?).await?;
        }
        Commands::Inspect {
            asset_id,
            status,
            notes,
            photo_url,
            lat,
            lng,
        } => {
            let args = InspectArgs {
                result: status,
                notes,
                photo_url,
                lat,
                lng,
            };
            run_inspect(&asset_id, args, &resolve_settings(global)?).await?;
        }
        Commands::Reset { asset_id } => run_reset(&asset_id, &resolve_settings(global)?).await?,
        Commands::Duplicates { json } => run_duplicates(json, &resolve_settings(global)?).await?,
        Commands::Cleanup { yes, json } => {
            run_cleanup(yes, json, &resolve_settings(global)?).await?;
        }
    }

    Ok(())
}
