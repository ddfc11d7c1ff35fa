//! JSON sidecar written next to each capture image.

use serde::{Deserialize, Serialize};

use crate::mosaic::TileStats;

use super::engine::CaptureResult;

/// Geometry and provenance of the composite image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
    pub zoom: u8,
    pub tile_server: String,
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// Everything needed to re-interpret a capture later: the annotation, the
/// polygon in both geographic and pixel space, and how the image was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub name: String,
    pub timestamp: String,
    pub category: String,
    pub color: String,
    /// Polygon vertices as (lon, lat) pairs.
    pub coordinates_lonlat: Vec<(f64, f64)>,
    /// Vertices in image pixels, top-left origin.
    pub coordinates_pixels: Vec<(i64, i64)>,
    /// Vertices in image pixels, bottom-left origin.
    pub coordinates_pixels_bottom_left: Vec<(i64, i64)>,
    /// PNG filename this record describes.
    pub image_file: String,
    pub image_metadata: ImageMeta,
    pub tile_stats: TileStats,
}

impl CaptureRecord {
    /// Build the sidecar for a finished capture.
    pub fn new(
        result: &CaptureResult,
        name: &str,
        category: &str,
        color: &str,
        tile_server: &str,
        timestamp: &str,
        image_file: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            timestamp: timestamp.to_string(),
            category: category.to_string(),
            color: color.to_string(),
            coordinates_lonlat: result.vertices.iter().map(|p| (p.lon, p.lat)).collect(),
            coordinates_pixels: result
                .pixels_top_left
                .iter()
                .map(|p| (p.x, p.y))
                .collect(),
            coordinates_pixels_bottom_left: result
                .pixels_bottom_left
                .iter()
                .map(|p| (p.x, p.y))
                .collect(),
            image_file: image_file.to_string(),
            image_metadata: ImageMeta {
                width: result.meta.width,
                height: result.meta.height,
                zoom: result.zoom,
                tile_server: tile_server.to_string(),
                min_lon: result.bbox.min_lon,
                min_lat: result.bbox.min_lat,
                max_lon: result.bbox.max_lon,
                max_lat: result.bbox.max_lat,
            },
            tile_stats: result.stats,
        }
    }

    /// Pretty-printed JSON for the sidecar file.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
