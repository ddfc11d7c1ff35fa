//! Output file naming.
//!
//! Captures are written as a PNG plus a JSON sidecar sharing a
//! timestamped stem, so a directory sorts chronologically and the pair
//! stays adjacent.

use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;

static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars() -> &'static Regex {
    // Characters rejected by at least one mainstream filesystem.
    UNSAFE_CHARS.get_or_init(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("constant pattern"))
}

/// Replaces filesystem-unsafe characters in a capture name with `_`.
pub fn sanitize_name(name: &str) -> String {
    unsafe_chars().replace_all(name.trim(), "_").into_owned()
}

/// Local timestamp in `YYYYmmdd_HHMMSS` form.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// PNG filename: `{timestamp}_{name}_z{zoom}.png`.
pub fn image_filename(timestamp: &str, name: &str, zoom: u8) -> String {
    format!("{}_{}_z{}.png", timestamp, sanitize_name(name), zoom)
}

/// Sidecar filename: `{timestamp}_{name}.json`.
pub fn record_filename(timestamp: &str, name: &str) -> String {
    format!("{}_{}.json", timestamp, sanitize_name(name))
}
