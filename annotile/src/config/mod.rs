//! Configuration: engine tunables, INI settings file, and the category
//! palette.

mod engine;
mod file;
mod palette;

pub use engine::{EngineConfig, DEFAULT_USER_AGENT};
pub use file::{default_config_path, ConfigError, Settings};
pub use palette::{CategoryPalette, DEFAULT_CATEGORY};
