//! The `servers` command: list the tile server registry.

use annotile::config::Settings;
use annotile::provider::DEFAULT_SERVER_KEY;

use crate::error::CliError;

/// Print every known tile server, built-in and config-defined.
pub fn run(settings: &Settings) -> Result<(), CliError> {
    println!("Tile Servers");
    println!("============");
    println!();

    let key_width = settings
        .servers
        .iter()
        .map(|s| s.key.len())
        .max()
        .unwrap_or(0);

    for server in settings.servers.iter() {
        let marker = if server.key == DEFAULT_SERVER_KEY {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:key_width$}  {}{}",
            server.key, server.name, marker
        );
        println!("  {:key_width$}  {}", "", server.template);
    }

    Ok(())
}
