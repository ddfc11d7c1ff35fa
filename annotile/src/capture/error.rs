//! Capture façade error types.

use std::fmt;

use crate::coord::CoordError;
use crate::provider::{HttpError, TemplateError};
use crate::zoom::ZoomError;

/// Errors that can abort a capture before any tile is fetched, or while
/// encoding its outputs.
#[derive(Debug)]
pub enum CaptureError {
    /// Polygon has fewer than three vertices.
    InvalidPolygon(usize),

    /// Tile URL template failed validation.
    Template(TemplateError),

    /// A polygon vertex is outside valid geographic range.
    Coord(CoordError),

    /// Zoom selection failed.
    Zoom(ZoomError),

    /// The covering grid came out empty.
    EmptyTileGrid,

    /// Failed to encode the composite raster.
    ImageEncode(String),

    /// Failed to construct the HTTP client.
    ClientBuild(HttpError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::InvalidPolygon(n) => {
                write!(f, "Polygon needs at least 3 vertices, got {}", n)
            }
            CaptureError::Template(e) => {
                write!(f, "Invalid tile URL template: {}", e)
            }
            CaptureError::Coord(e) => {
                write!(f, "Invalid coordinate: {}", e)
            }
            CaptureError::Zoom(e) => {
                write!(f, "Zoom selection failed: {}", e)
            }
            CaptureError::EmptyTileGrid => {
                write!(f, "Covering tile grid is empty")
            }
            CaptureError::ImageEncode(msg) => {
                write!(f, "Failed to encode composite image: {}", msg)
            }
            CaptureError::ClientBuild(e) => {
                write!(f, "Failed to build HTTP client: {}", e)
            }
            CaptureError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Template(e) => Some(e),
            CaptureError::Coord(e) => Some(e),
            CaptureError::Zoom(e) => Some(e),
            CaptureError::ClientBuild(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TemplateError> for CaptureError {
    fn from(e: TemplateError) -> Self {
        CaptureError::Template(e)
    }
}

impl From<CoordError> for CaptureError {
    fn from(e: CoordError) -> Self {
        CaptureError::Coord(e)
    }
}

impl From<ZoomError> for CaptureError {
    fn from(e: ZoomError) -> Self {
        CaptureError::Zoom(e)
    }
}
