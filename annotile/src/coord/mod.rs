//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (longitude/latitude)
//! and slippy-map tile coordinates via the Web Mercator projection. At zoom
//! level z the world is divided into 2^z x 2^z square tiles of 256x256 pixels.

mod types;

pub use types::{
    CoordError, GeoBoundingBox, GeoPoint, TileBounds, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON, TILE_SIZE,
};

use std::f64::consts::PI;

/// Converts a geographic point to the tile containing it.
///
/// Latitudes beyond the Web Mercator limit are clamped to ±85.05112878°
/// so near-polar input still lands on the edge tile row; longitude 180°
/// is clamped onto the last tile column.
///
/// # Errors
///
/// Returns an error if the longitude is outside -180..180, the latitude
/// outside -90..90, or the zoom above the supported maximum.
#[inline]
pub fn point_to_tile(point: GeoPoint, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LON..=MAX_LON).contains(&point.lon) {
        return Err(CoordError::InvalidLongitude(point.lon));
    }
    if !(-90.0..=90.0).contains(&point.lat) {
        return Err(CoordError::InvalidLatitude(point.lat));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let lat = point.lat.clamp(MIN_LAT, MAX_LAT);
    let n = 2.0_f64.powi(zoom as i32);
    let max_index = (1u32 << zoom) - 1;

    // Longitude maps linearly to the tile column
    let x = ((point.lon + 180.0) / 360.0 * n) as u32;

    // Latitude maps to the tile row via Web Mercator
    let lat_rad = lat * PI / 180.0;
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    Ok(TileCoord {
        x: x.min(max_index),
        y: y.min(max_index),
        zoom,
    })
}

/// Returns the longitude/latitude of a tile's northwest corner.
#[inline]
pub fn tile_nw_corner(tile: TileCoord) -> GeoPoint {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    GeoPoint { lon, lat }
}

/// Returns the geographic extent of a tile.
///
/// The west/north edges are the tile's own origin corner; the east/south
/// edges are the northwest corner of the diagonal neighbor.
#[inline]
pub fn tile_bounds(tile: TileCoord) -> TileBounds {
    let nw = tile_nw_corner(tile);
    let se = tile_nw_corner(TileCoord {
        x: tile.x + 1,
        y: tile.y + 1,
        zoom: tile.zoom,
    });

    TileBounds {
        west: nw.lon,
        north: nw.lat,
        east: se.lon,
        south: se.lat,
    }
}
