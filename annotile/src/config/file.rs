//! INI-backed settings.
//!
//! [`Settings`] starts from built-in defaults and overlays whatever the
//! config file provides. A missing file is not an error; a malformed one is.

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::provider::{TileServers, UrlTemplate};
use crate::zoom::CapPolicy;

use super::engine::EngineConfig;
use super::palette::CategoryPalette;

/// Error loading or validating a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] ini::Error),

    #[error("invalid config value [{section}] {key} = '{value}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Effective settings: engine tunables, the tile server registry, and the
/// category palette.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub servers: TileServers,
    pub palette: CategoryPalette,
}

impl Settings {
    /// Load settings from the default config path. Missing file means
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from `path`, overlaying defaults. Missing file means
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }
}

/// Platform config path: `<config_dir>/annotile/config.ini`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("annotile").join("config.ini"))
}

/// Parse an `Ini` object into [`Settings`].
///
/// Starts from `Settings::default()` and overlays any values found in the
/// INI. Unknown keys are warned about, not rejected.
fn parse_ini(ini: &Ini) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    // [capture] section
    if let Some(section) = ini.section(Some("capture")) {
        for (key, value) in section.iter() {
            match key {
                "preferred_zoom" => {
                    settings.engine.zoom.preferred =
                        value.parse().map_err(|_| ConfigError::InvalidValue {
                            section: "capture".to_string(),
                            key: "preferred_zoom".to_string(),
                            value: value.to_string(),
                            reason: "must be an integer zoom level (0-22)".to_string(),
                        })?;
                }
                "min_zoom" => {
                    settings.engine.zoom.minimum =
                        value.parse().map_err(|_| ConfigError::InvalidValue {
                            section: "capture".to_string(),
                            key: "min_zoom".to_string(),
                            value: value.to_string(),
                            reason: "must be an integer zoom level (0-22)".to_string(),
                        })?;
                }
                "tile_cap" => {
                    settings.engine.zoom.tile_cap =
                        value.parse().map_err(|_| ConfigError::InvalidValue {
                            section: "capture".to_string(),
                            key: "tile_cap".to_string(),
                            value: value.to_string(),
                            reason: "must be a positive integer".to_string(),
                        })?;
                }
                "cap_policy" => {
                    settings.engine.zoom.cap_policy = match value.trim().to_lowercase().as_str() {
                        "use-min-zoom" | "min-zoom" => CapPolicy::UseMinZoom,
                        "fail" => CapPolicy::Fail,
                        _ => {
                            return Err(ConfigError::InvalidValue {
                                section: "capture".to_string(),
                                key: "cap_policy".to_string(),
                                value: value.to_string(),
                                reason: "must be 'use-min-zoom' or 'fail'".to_string(),
                            });
                        }
                    };
                }
                other => {
                    tracing::warn!(key = other, "unknown key in [capture] section, ignoring");
                }
            }
        }
    }

    // [fetch] section
    if let Some(section) = ini.section(Some("fetch")) {
        for (key, value) in section.iter() {
            match key {
                "attempts" => {
                    settings.engine.fetch.attempts =
                        value.parse().map_err(|_| ConfigError::InvalidValue {
                            section: "fetch".to_string(),
                            key: "attempts".to_string(),
                            value: value.to_string(),
                            reason: "must be a positive integer".to_string(),
                        })?;
                }
                "retry_delay_ms" => {
                    let ms: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                        section: "fetch".to_string(),
                        key: "retry_delay_ms".to_string(),
                        value: value.to_string(),
                        reason: "must be a positive integer (milliseconds)".to_string(),
                    })?;
                    settings.engine.fetch.retry_delay = std::time::Duration::from_millis(ms);
                }
                "timeout_secs" => {
                    let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                        section: "fetch".to_string(),
                        key: "timeout_secs".to_string(),
                        value: value.to_string(),
                        reason: "must be a positive integer (seconds)".to_string(),
                    })?;
                    settings.engine.fetch.request_timeout = std::time::Duration::from_secs(secs);
                }
                "workers" => {
                    settings.engine.fetch.max_workers =
                        value.parse().map_err(|_| ConfigError::InvalidValue {
                            section: "fetch".to_string(),
                            key: "workers".to_string(),
                            value: value.to_string(),
                            reason: "must be a positive integer".to_string(),
                        })?;
                }
                "user_agent" => {
                    let v = value.trim();
                    if !v.is_empty() {
                        settings.engine.user_agent = v.to_string();
                    }
                }
                other => {
                    tracing::warn!(key = other, "unknown key in [fetch] section, ignoring");
                }
            }
        }
    }

    // [servers] section: key = url template
    if let Some(section) = ini.section(Some("servers")) {
        for (key, value) in section.iter() {
            let template = value.trim();
            UrlTemplate::parse(template).map_err(|e| ConfigError::InvalidValue {
                section: "servers".to_string(),
                key: key.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })?;
            settings.servers.insert(key, key, template);
        }
    }

    // [categories] section: name = #rrggbb
    if let Some(section) = ini.section(Some("categories")) {
        for (key, value) in section.iter() {
            let color = value.trim();
            if !is_hex_color(color) {
                return Err(ConfigError::InvalidValue {
                    section: "categories".to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "must be a '#rrggbb' hex color".to_string(),
                });
            }
            settings.palette.insert(key, color.to_lowercase());
        }
    }

    Ok(settings)
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&temp_dir.path().join("absent.ini")).unwrap();
        assert_eq!(settings.engine, EngineConfig::default());
        assert_eq!(settings.palette, CategoryPalette::default());
    }

    #[test]
    fn test_partial_config_overlays_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        std::fs::write(
            &config_path,
            r#"
[capture]
tile_cap = 150
cap_policy = fail

[fetch]
timeout_secs = 30
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.engine.zoom.tile_cap, 150);
        assert_eq!(settings.engine.zoom.cap_policy, CapPolicy::Fail);
        assert_eq!(
            settings.engine.fetch.request_timeout,
            std::time::Duration::from_secs(30)
        );
        // Untouched defaults
        assert_eq!(settings.engine.zoom.preferred, 19);
        assert_eq!(settings.engine.fetch.attempts, 3);
    }

    #[test]
    fn test_invalid_cap_policy_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        std::fs::write(
            &config_path,
            r#"
[capture]
cap_policy = explode
"#,
        )
        .unwrap();

        let err = Settings::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("cap_policy"));
    }

    #[test]
    fn test_custom_server_registered() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        std::fs::write(
            &config_path,
            r#"
[servers]
local = http://localhost:8080/{z}/{x}/{y}.png
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(
            settings.servers.template_for("local"),
            "http://localhost:8080/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn test_bad_server_template_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        std::fs::write(
            &config_path,
            r#"
[servers]
broken = http://tiles.test/{z}/{x}.png
"#,
        )
        .unwrap();

        assert!(Settings::load_from(&config_path).is_err());
    }

    #[test]
    fn test_category_colors_parsed_and_validated() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        std::fs::write(
            &config_path,
            r#"
[categories]
runway = #A0B1C2
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.palette.color_for("runway"), "#a0b1c2");

        std::fs::write(
            &config_path,
            r#"
[categories]
runway = red
"#,
        )
        .unwrap();
        assert!(Settings::load_from(&config_path).is_err());
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#e6194b"));
        assert!(is_hex_color("#FFFFFF"));
        assert!(!is_hex_color("e6194b"));
        assert!(!is_hex_color("#e6194"));
        assert!(!is_hex_color("#e6194zz"));
    }
}
