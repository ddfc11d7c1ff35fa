//! The `config` command: show the effective configuration.

use std::path::Path;

use annotile::config::{default_config_path, Settings};
use annotile::zoom::CapPolicy;

use crate::error::CliError;

/// Print the config file location and the effective settings, after
/// defaults and file overlay.
pub fn run(settings: &Settings, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = match config_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };
    match path {
        Some(p) if p.exists() => println!("Config file: {}", p.display()),
        Some(p) => println!("Config file: {} (not present, using defaults)", p.display()),
        None => println!("Config file: (no platform config directory)"),
    }
    println!();

    let zoom = &settings.engine.zoom;
    println!("[capture]");
    println!("preferred_zoom = {}", zoom.preferred);
    println!("min_zoom = {}", zoom.minimum);
    println!("tile_cap = {}", zoom.tile_cap);
    let policy = match zoom.cap_policy {
        CapPolicy::UseMinZoom => "use-min-zoom",
        CapPolicy::Fail => "fail",
    };
    println!("cap_policy = {}", policy);
    println!();

    let fetch = &settings.engine.fetch;
    println!("[fetch]");
    println!("attempts = {}", fetch.attempts);
    println!("retry_delay_ms = {}", fetch.retry_delay.as_millis());
    println!("timeout_secs = {}", fetch.request_timeout.as_secs());
    println!("workers = {}", fetch.max_workers);
    println!("user_agent = {}", settings.engine.user_agent);
    println!();

    println!("[categories]");
    for (name, color) in settings.palette.iter() {
        println!("{} = {}", name, color);
    }

    Ok(())
}
