//! Zoom level selection under a tile-count cap.
//!
//! Scans from the preferred zoom down to the minimum and takes the first
//! level whose covering grid fits the cap. What happens when no level fits
//! is a named policy, not a silent fall-through.

use crate::coord::{CoordError, GeoBoundingBox, MAX_ZOOM};
use crate::grid::TileGrid;

/// What to do when even the minimum zoom exceeds the tile-count cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapPolicy {
    /// Accept the oversized grid at the minimum zoom.
    #[default]
    UseMinZoom,
    /// Surface [`ZoomError::CapExceeded`] instead of fetching an oversized grid.
    Fail,
}

/// Zoom selection bounds and cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomSettings {
    /// Highest zoom to try first.
    pub preferred: u8,
    /// Lowest zoom to fall back to.
    pub minimum: u8,
    /// Maximum tiles a capture may fetch.
    pub tile_cap: u64,
    /// Behavior when the cap cannot be met.
    pub cap_policy: CapPolicy,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            preferred: 19,
            minimum: 12,
            tile_cap: 400,
            cap_policy: CapPolicy::UseMinZoom,
        }
    }
}

/// The zoom chosen for a capture, with the grid size that justified it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomSelection {
    /// Selected zoom level.
    pub zoom: u8,
    /// Tiles the covering grid holds at that zoom.
    pub tile_count: u64,
    /// False when the [`CapPolicy::UseMinZoom`] fallback accepted an
    /// oversized grid.
    pub within_cap: bool,
}

/// Error selecting a zoom level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoomError {
    /// Minimum zoom above preferred, or preferred above the supported maximum
    #[error("invalid zoom range: minimum {minimum} to preferred {preferred}")]
    InvalidRange { preferred: u8, minimum: u8 },

    /// No zoom in range satisfied the cap and the policy forbids oversizing
    #[error("tile cap exceeded: {tile_count} tiles at minimum zoom, cap is {cap}")]
    CapExceeded { cap: u64, tile_count: u64 },

    /// Grid computation failed
    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Picks the highest zoom in `[minimum, preferred]` whose covering grid has
/// at most `tile_cap` tiles.
///
/// Pure function, no I/O. Monotonic in the cap: raising the cap never
/// lowers the chosen zoom for a fixed bounding box.
pub fn select_zoom(
    bbox: &GeoBoundingBox,
    settings: &ZoomSettings,
) -> Result<ZoomSelection, ZoomError> {
    if settings.minimum > settings.preferred || settings.preferred > MAX_ZOOM {
        return Err(ZoomError::InvalidRange {
            preferred: settings.preferred,
            minimum: settings.minimum,
        });
    }

    let mut minimum_count = 0;
    for zoom in (settings.minimum..=settings.preferred).rev() {
        let count = TileGrid::covering(bbox, zoom)?.tile_count();
        if count <= settings.tile_cap {
            return Ok(ZoomSelection {
                zoom,
                tile_count: count,
                within_cap: true,
            });
        }
        minimum_count = count;
    }

    match settings.cap_policy {
        CapPolicy::UseMinZoom => Ok(ZoomSelection {
            zoom: settings.minimum,
            tile_count: minimum_count,
            within_cap: false,
        }),
        CapPolicy::Fail => Err(ZoomError::CapExceeded {
            cap: settings.tile_cap,
            tile_count: minimum_count,
        }),
    }
}
