//! Shared helpers for CLI commands.

use std::path::Path;

use annotile::config::Settings;

use crate::error::CliError;

/// Load settings from an explicit path or the platform default location.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, CliError> {
    let settings = match config_path {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    Ok(settings)
}

/// Resolve the tile URL template: an explicit `--template` wins, otherwise
/// the named server is looked up in the registry (unknown keys fall back to
/// the default server).
pub fn resolve_template(settings: &Settings, server: &str, template: Option<&str>) -> String {
    match template {
        Some(t) => t.to_string(),
        None => settings.servers.template_for(server).to_string(),
    }
}
