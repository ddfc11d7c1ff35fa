//! Geographic-to-pixel projection within a composite raster.
//!
//! The in-tile step interpolates linearly across the tile's geographic
//! span. This is a local approximation of the inverse Web Mercator
//! projection, not an exact one: within a single tile at high zoom the
//! error is sub-pixel, but it grows with tile size and latitude, so it is
//! not suitable where sub-pixel geodetic accuracy is required.

use serde::{Deserialize, Serialize};

use crate::coord::{self, CoordError, GeoPoint, TILE_SIZE};
use crate::mosaic::MosaicMeta;

/// Vertical origin convention of a pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// y grows downward from the raster's top edge.
    TopLeft,
    /// y grows upward from the raster's bottom edge.
    BottomLeft,
}

/// Integer pixel position tagged with its origin convention, so the two
/// conventions cannot be silently mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
    pub origin: Origin,
}

impl PixelPoint {
    /// Re-expresses the point under the opposite vertical origin.
    ///
    /// Pure arithmetic on the already-projected value, no recomputation.
    /// Applying it twice with the same height returns the original point.
    pub fn flipped(&self, raster_height: u32) -> PixelPoint {
        PixelPoint {
            x: self.x,
            y: raster_height as i64 - self.y,
            origin: match self.origin {
                Origin::TopLeft => Origin::BottomLeft,
                Origin::BottomLeft => Origin::TopLeft,
            },
        }
    }
}

/// Projects a geographic point into a raster's pixel space, top-left origin.
///
/// # Errors
///
/// Returns an error if the point is outside geographic range.
pub fn project_point(point: GeoPoint, meta: &MosaicMeta) -> Result<PixelPoint, CoordError> {
    let tile = coord::point_to_tile(point, meta.zoom)?;
    let bounds = coord::tile_bounds(tile);

    let lon_span = bounds.east - bounds.west;
    let lat_span = bounds.north - bounds.south;

    // Real tiles never have zero span; the guard keeps the math total.
    let fx = if lon_span == 0.0 {
        0.0
    } else {
        (point.lon - bounds.west) / lon_span
    };
    let fy = if lat_span == 0.0 {
        0.0
    } else {
        (bounds.north - point.lat) / lat_span
    };

    // 0..=255 offset within the tile, so an in-bounds vertex never lands
    // past the tile's last pixel column/row.
    let in_tile_x = (fx.clamp(0.0, 1.0) * (TILE_SIZE - 1) as f64).round() as i64;
    let in_tile_y = (fy.clamp(0.0, 1.0) * (TILE_SIZE - 1) as f64).round() as i64;

    let x = (tile.x as i64 - meta.min_x as i64) * TILE_SIZE as i64 + in_tile_x;
    let y = (tile.y as i64 - meta.min_y as i64) * TILE_SIZE as i64 + in_tile_y;

    Ok(PixelPoint {
        x,
        y,
        origin: Origin::TopLeft,
    })
}

/// Projects a vertex ring, producing both origin conventions from a single
/// projection pass per vertex.
pub fn project_ring(
    points: &[GeoPoint],
    meta: &MosaicMeta,
) -> Result<(Vec<PixelPoint>, Vec<PixelPoint>), CoordError> {
    let mut top_left = Vec::with_capacity(points.len());
    let mut bottom_left = Vec::with_capacity(points.len());

    for &point in points {
        let projected = project_point(point, meta)?;
        bottom_left.push(projected.flipped(meta.height));
        top_left.push(projected);
    }

    Ok((top_left, bottom_left))
}
