//! Annotile CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Annotile library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;

use commands::{capture, common, config, servers};
use error::CliError;

#[derive(Parser)]
#[command(name = "annotile")]
#[command(about = "Capture slippy-map tile mosaics for annotated polygons", long_about = None)]
#[command(version)]
struct Cli {
    /// Also append log lines to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Config file path (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a polygon as a composite tile raster plus a JSON record
    Capture(capture::CaptureArgs),
    /// List the known tile servers
    Servers,
    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let _guard = match annotile::logging::init_logging(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let settings = match common::load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Commands::Capture(args) => capture::run(args, settings),
        Commands::Servers => servers::run(&settings),
        Commands::Config => config::run(&settings, cli.config.as_deref()),
    };

    if let Err(e) = result {
        e.exit();
    }
}
