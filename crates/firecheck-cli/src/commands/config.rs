use std::path::PathBuf;

use firecheck_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::{resolve_settings, GlobalArgs};
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global: GlobalArgs) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            owner,
            workspace,
            db_path,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global.profile.as_deref()),
            owner,
            workspace,
            db_path,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    owner: Option<String>,
    workspace: Option<String>,
    db_path: Option<PathBuf>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(value) = normalize_text_option(owner) {
        profile.owner = Some(value);
    }
    if let Some(value) = normalize_text_option(workspace) {
        profile.workspace = Some(value);
    }
    if let Some(value) = db_path {
        profile.db_path = Some(value);
    }
    let has_scope = profile.owner.is_some() || profile.workspace.is_some();

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    if !has_scope {
        println!("Profile '{profile_name}' has no default owner or workspace.");
    }

    Ok(())
}

fn run_config_show(global: GlobalArgs) -> Result<(), CliError> {
    let config_path = default_config_path().map_err(CliError::Config)?;
    println!("config:   {}", config_path.display());

    let settings = resolve_settings(global)?;
    println!("database: {}", settings.db_path.display());
    println!("scope:    {}", serde_json::to_string(&settings.scope)?);
    Ok(())
}
