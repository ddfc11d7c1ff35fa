//! Built-in tile server registry.
//!
//! Maps short server keys to URL templates. The registry is a plain value
//! injected by the caller, not ambient global state; the engine itself only
//! ever sees a single template.

/// Key of the server used when a lookup misses.
pub const DEFAULT_SERVER_KEY: &str = "esri";

/// One registry entry: a CLI-friendly key, a display name, and the
/// `{x}/{y}/{z}` URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileServer {
    pub key: String,
    pub name: String,
    pub template: String,
}

/// Registry of known tile servers.
#[derive(Debug, Clone)]
pub struct TileServers {
    entries: Vec<TileServer>,
}

impl Default for TileServers {
    fn default() -> Self {
        let builtin = [
            (
                "esri",
                "Esri World Imagery",
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            ),
            (
                "google-satellite",
                "Google Satellite",
                "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
            ),
            (
                "google-hybrid",
                "Google Hybrid",
                "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}",
            ),
            (
                "google-roads",
                "Google Roads",
                "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}",
            ),
            (
                "google-terrain",
                "Google Terrain",
                "https://mt1.google.com/vt/lyrs=p&x={x}&y={y}&z={z}",
            ),
            (
                "osm",
                "OpenStreetMap",
                "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            ),
            (
                "opentopo",
                "OpenTopoMap",
                "https://tile.opentopomap.org/{z}/{x}/{y}.png",
            ),
            (
                "carto-dark",
                "CartoDB Dark",
                "https://basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
            ),
            (
                "carto-light",
                "CartoDB Light",
                "https://basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
            ),
        ];

        Self {
            entries: builtin
                .into_iter()
                .map(|(key, name, template)| TileServer {
                    key: key.to_string(),
                    name: name.to_string(),
                    template: template.to_string(),
                })
                .collect(),
        }
    }
}

impl TileServers {
    /// Looks up a server by key.
    pub fn get(&self, key: &str) -> Option<&TileServer> {
        self.entries.iter().find(|s| s.key == key)
    }

    /// Returns the URL template for `key`, falling back to the Esri World
    /// Imagery default when the key is unknown.
    pub fn template_for(&self, key: &str) -> &str {
        self.get(key)
            .or_else(|| self.get(DEFAULT_SERVER_KEY))
            .map(|s| s.template.as_str())
            .unwrap_or_default()
    }

    /// Adds a server, replacing any existing entry with the same key.
    pub fn insert(&mut self, key: &str, name: &str, template: &str) {
        let entry = TileServer {
            key: key.to_string(),
            name: name.to_string(),
            template: template.to_string(),
        };
        match self.entries.iter_mut().find(|s| s.key == key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Iterates over all registered servers.
    pub fn iter(&self) -> impl Iterator<Item = &TileServer> {
        self.entries.iter()
    }

    /// Number of registered servers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::UrlTemplate;

    #[test]
    fn test_default_registry_has_nine_servers() {
        assert_eq!(TileServers::default().len(), 9);
    }

    #[test]
    fn test_all_builtin_templates_are_valid() {
        for server in TileServers::default().iter() {
            assert!(
                UrlTemplate::parse(&server.template).is_ok(),
                "template for '{}' should validate",
                server.key
            );
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_esri() {
        let servers = TileServers::default();
        assert_eq!(
            servers.template_for("nonexistent"),
            servers.template_for(DEFAULT_SERVER_KEY)
        );
    }

    #[test]
    fn test_insert_overrides_existing_key() {
        let mut servers = TileServers::default();
        servers.insert("osm", "My OSM Mirror", "https://osm.example.com/{z}/{x}/{y}.png");

        assert_eq!(servers.len(), 9);
        assert_eq!(
            servers.template_for("osm"),
            "https://osm.example.com/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn test_insert_adds_new_key() {
        let mut servers = TileServers::default();
        servers.insert("local", "Local Stub", "http://localhost:8080/{z}/{x}/{y}.png");

        assert_eq!(servers.len(), 10);
        assert!(servers.get("local").is_some());
    }
}
