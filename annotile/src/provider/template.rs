//! Tile URL templates.
//!
//! A template is any HTTP(S) URL containing literal `{x}`, `{y}` and `{z}`
//! placeholders for the tile column, row and zoom, e.g.
//! `https://tile.openstreetmap.org/{z}/{x}/{y}.png`.

use crate::coord::TileCoord;

/// Error validating a tile URL template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Template lacks one of the required placeholders
    #[error("URL template is missing the {{{0}}} placeholder")]
    MissingPlaceholder(char),

    /// Template is not an absolute HTTP(S) URL
    #[error("URL template must start with http:// or https://")]
    NotHttp,
}

/// A validated tile URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Validates and wraps a template string.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is not an absolute HTTP(S) URL or
    /// is missing any of the `{x}`, `{y}`, `{z}` placeholders.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if !template.starts_with("http://") && !template.starts_with("https://") {
            return Err(TemplateError::NotHttp);
        }

        for placeholder in ['x', 'y', 'z'] {
            if !template.contains(&format!("{{{}}}", placeholder)) {
                return Err(TemplateError::MissingPlaceholder(placeholder));
            }
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    /// Substitutes a tile coordinate into the template.
    pub fn url_for(&self, tile: &TileCoord) -> String {
        self.template
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{z}", &tile.zoom.to_string())
    }

    /// The underlying template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_template() {
        let template = UrlTemplate::parse("https://tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert!(template.is_ok());
    }

    #[test]
    fn test_parse_query_string_template() {
        // Google-style templates carry placeholders in the query string
        let template = UrlTemplate::parse("https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}");
        assert!(template.is_ok());
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let result = UrlTemplate::parse("https://tiles.example.com/{z}/{x}.png");
        assert_eq!(result.unwrap_err(), TemplateError::MissingPlaceholder('y'));
    }

    #[test]
    fn test_non_http_rejected() {
        let result = UrlTemplate::parse("ftp://tiles.example.com/{z}/{x}/{y}.png");
        assert_eq!(result.unwrap_err(), TemplateError::NotHttp);
    }

    #[test]
    fn test_url_substitution() {
        let template = UrlTemplate::parse("https://tile.openstreetmap.org/{z}/{x}/{y}.png").unwrap();
        let tile = TileCoord {
            x: 19295,
            y: 24640,
            zoom: 16,
        };

        assert_eq!(
            template.url_for(&tile),
            "https://tile.openstreetmap.org/16/19295/24640.png"
        );
    }

    #[test]
    fn test_url_substitution_repeated_placeholders() {
        let template =
            UrlTemplate::parse("https://tiles.example.com/{z}/{x}/{y}?mirror={x}").unwrap();
        let tile = TileCoord {
            x: 3,
            y: 4,
            zoom: 5,
        };

        assert_eq!(
            template.url_for(&tile),
            "https://tiles.example.com/5/3/4?mirror=3"
        );
    }
}
