//! Annotation category palette.
//!
//! Every capture is tagged with a category name and a display color. The
//! built-in palette covers common rooftop-survey categories; config files
//! may add or override entries.

use std::collections::BTreeMap;

/// Category assumed when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "rooftop";

const BUILT_IN: &[(&str, &str)] = &[
    ("rooftop", "#e6194b"),
    ("rooftop free area", "#3cb44b"),
    ("rooftop obstacle", "#ffe119"),
    ("street", "#4363d8"),
    ("ground mount area", "#f58231"),
    ("pv module", "#911eb4"),
    ("water", "#42d4f4"),
    ("trees", "#bfef45"),
    ("grass", "#fabed4"),
];

/// Maps category names to `#rrggbb` display colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPalette {
    colors: BTreeMap<String, String>,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        let colors = BUILT_IN
            .iter()
            .map(|(name, color)| (name.to_string(), color.to_string()))
            .collect();
        Self { colors }
    }
}

impl CategoryPalette {
    /// Color for `category`, falling back to the default category's color
    /// when the name is unknown.
    pub fn color_for(&self, category: &str) -> &str {
        self.colors
            .get(category)
            .or_else(|| self.colors.get(DEFAULT_CATEGORY))
            .map(String::as_str)
            .unwrap_or("#e6194b")
    }

    /// True when `category` has an explicit palette entry.
    pub fn contains(&self, category: &str) -> bool {
        self.colors.contains_key(category)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, category: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(category.into(), color.into());
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_has_nine_categories() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.len(), 9);
        assert!(palette.contains(DEFAULT_CATEGORY));
    }

    #[test]
    fn test_known_category_color() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color_for("street"), "#4363d8");
        assert_eq!(palette.color_for("water"), "#42d4f4");
    }

    #[test]
    fn test_unknown_category_falls_back_to_default() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color_for("runway"), palette.color_for("rooftop"));
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut palette = CategoryPalette::default();
        palette.insert("street", "#000000");
        assert_eq!(palette.color_for("street"), "#000000");
    }
}
