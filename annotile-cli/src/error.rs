//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use annotile::capture::CaptureError;
use annotile::zoom::ZoomError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Polygon vertices could not be read or parsed
    Vertices(String),
    /// Capture pipeline failure
    Capture(CaptureError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Capture(CaptureError::Zoom(ZoomError::CapExceeded { cap, tile_count })) => {
                eprintln!();
                eprintln!(
                    "The polygon needs {} tiles at the minimum zoom, but the cap is {}.",
                    tile_count, cap
                );
                eprintln!("Options:");
                eprintln!("  1. Raise the cap with --tile-cap");
                eprintln!("  2. Drop --strict-cap to accept the oversized minimum-zoom grid");
                eprintln!("  3. Split the polygon into smaller captures");
            }
            CliError::Vertices(_) => {
                eprintln!();
                eprintln!("Vertices are given as --vertex LON,LAT (at least three times),");
                eprintln!("or as a JSON file of [lon, lat] pairs via --vertices-file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Vertices(msg) => write!(f, "Invalid polygon vertices: {}", msg),
            CliError::Capture(e) => write!(f, "Capture failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Capture(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<CaptureError> for CliError {
    fn from(e: CaptureError) -> Self {
        CliError::Capture(e)
    }
}

impl From<annotile::config::ConfigError> for CliError {
    fn from(e: annotile::config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
