//! Core geographic and tile coordinate types.

use std::fmt;

/// Minimum latitude representable in Web Mercator (degrees).
pub const MIN_LAT: f64 = -85.05112878;

/// Maximum latitude representable in Web Mercator (degrees).
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum longitude (degrees).
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude (degrees).
pub const MAX_LON: f64 = 180.0;

/// Highest zoom level accepted by the conversion functions.
pub const MAX_ZOOM: u8 = 22;

/// Tile edge length in pixels.
pub const TILE_SIZE: u32 = 256;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees (-180 to 180, increases eastward)
    pub lon: f64,
    /// Latitude in degrees (-90 to 90, increases northward)
    pub lat: f64,
}

impl GeoPoint {
    /// Creates a new geographic point. Range checks happen at conversion time.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}

/// Axis-aligned geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBoundingBox {
    /// Computes the bounding box of a set of points.
    ///
    /// Every point is range-checked; latitudes beyond the Web Mercator limit
    /// are accepted here and clamped later during tile conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty or any point is outside
    /// -180..180 longitude / -90..90 latitude.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self, CoordError> {
        let first = points.first().ok_or(CoordError::EmptyPointSet)?;

        let mut bbox = GeoBoundingBox {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };

        for point in points {
            if !(-90.0..=90.0).contains(&point.lat) {
                return Err(CoordError::InvalidLatitude(point.lat));
            }
            if !(MIN_LON..=MAX_LON).contains(&point.lon) {
                return Err(CoordError::InvalidLongitude(point.lon));
            }
            bbox.min_lon = bbox.min_lon.min(point.lon);
            bbox.min_lat = bbox.min_lat.min(point.lat);
            bbox.max_lon = bbox.max_lon.max(point.lon);
            bbox.max_lat = bbox.max_lat.max(point.lat);
        }

        Ok(bbox)
    }

    /// Center of the box. Used as a fallback anchor for degenerate grids.
    pub fn centroid(&self) -> GeoPoint {
        GeoPoint {
            lon: (self.min_lon + self.max_lon) / 2.0,
            lat: (self.min_lat + self.max_lat) / 2.0,
        }
    }
}

/// Web Mercator tile address at a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Tile column (increases eastward)
    pub x: u32,
    /// Tile row (increases southward)
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Geographic extent of a single tile.
///
/// North/west are the tile's origin corner; east/south belong to the
/// neighboring tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Western edge longitude
    pub west: f64,
    /// Northern edge latitude
    pub north: f64,
    /// Eastern edge longitude
    pub east: f64,
    /// Southern edge latitude
    pub south: f64,
}

/// Error converting between geographic and tile coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude outside -90 to 90 degrees
    InvalidLatitude(f64),
    /// Longitude outside -180 to 180 degrees
    InvalidLongitude(f64),
    /// Zoom level above the supported maximum
    InvalidZoom(u8),
    /// Bounding box requested for an empty point set
    EmptyPointSet,
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(f, "Latitude {} is outside the valid range -90 to 90", lat)
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Longitude {} is outside the valid range -180 to 180",
                    lon
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(f, "Zoom level {} exceeds the maximum {}", zoom, MAX_ZOOM)
            }
            CoordError::EmptyPointSet => {
                write!(f, "Cannot compute a bounding box from zero points")
            }
        }
    }
}

impl std::error::Error for CoordError {}
