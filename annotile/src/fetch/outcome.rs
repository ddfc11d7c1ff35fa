//! Per-tile fetch outcomes.

use image::{Rgb, RgbImage};

use crate::coord::{TileCoord, TILE_SIZE};

/// Flat fill used when a tile cannot be retrieved.
pub const PLACEHOLDER_COLOR: [u8; 3] = [200, 200, 200];

/// Why a tile attempt (or the whole tile) failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    /// Non-200 HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Content-Type header did not contain "image"
    #[error("not an image (Content-Type: {0})")]
    NotAnImage(String),

    /// Body failed to decode as a raster image
    #[error("undecodable image body: {0}")]
    Decode(String),

    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Network(String),

    /// Attempt exceeded the per-attempt timeout
    #[error("request timed out")]
    Timeout,

    /// Capture was cancelled before the tile completed
    #[error("cancelled")]
    Cancelled,
}

/// One immutable record per requested tile.
///
/// `pixels` is always 256×256: either the decoded upstream tile or a
/// placeholder. Failures never escape the fetcher; they end up here as
/// `placeholder == true` with the last error kept for diagnostics.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The tile this outcome belongs to.
    pub coord: TileCoord,
    /// Decoded tile pixels, or the placeholder fill.
    pub pixels: RgbImage,
    /// True when `pixels` is a placeholder rather than upstream imagery.
    pub placeholder: bool,
    /// Attempts issued for this tile.
    pub attempts: u32,
    /// The error from the last failed attempt, if any.
    pub last_error: Option<FetchFailure>,
}

impl FetchOutcome {
    /// Outcome for a successfully fetched and decoded tile.
    pub fn fetched(coord: TileCoord, pixels: RgbImage, attempts: u32) -> Self {
        Self {
            coord,
            pixels,
            placeholder: false,
            attempts,
            last_error: None,
        }
    }

    /// Placeholder outcome after all attempts were exhausted or cancelled.
    pub fn placeholder(coord: TileCoord, attempts: u32, error: FetchFailure) -> Self {
        Self {
            coord,
            pixels: placeholder_tile(),
            placeholder: true,
            attempts,
            last_error: Some(error),
        }
    }
}

/// A flat neutral-colored tile raster.
pub fn placeholder_tile() -> RgbImage {
    RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(PLACEHOLDER_COLOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_tile_dimensions_and_color() {
        let tile = placeholder_tile();
        assert_eq!(tile.dimensions(), (TILE_SIZE, TILE_SIZE));
        assert_eq!(tile.get_pixel(0, 0).0, PLACEHOLDER_COLOR);
        assert_eq!(tile.get_pixel(255, 255).0, PLACEHOLDER_COLOR);
    }

    #[test]
    fn test_placeholder_outcome_records_error() {
        let coord = TileCoord {
            x: 1,
            y: 2,
            zoom: 3,
        };
        let outcome = FetchOutcome::placeholder(coord, 3, FetchFailure::Status(503));

        assert!(outcome.placeholder);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.last_error, Some(FetchFailure::Status(503)));
        assert_eq!(outcome.pixels.dimensions(), (TILE_SIZE, TILE_SIZE));
    }

    #[test]
    fn test_outcome_types_cross_task_boundaries() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FetchOutcome>();
        assert_send_sync::<FetchFailure>();
    }

    #[test]
    fn test_fetched_outcome_has_no_error() {
        let coord = TileCoord {
            x: 0,
            y: 0,
            zoom: 1,
        };
        let outcome = FetchOutcome::fetched(coord, placeholder_tile(), 1);

        assert!(!outcome.placeholder);
        assert!(outcome.last_error.is_none());
    }
}
