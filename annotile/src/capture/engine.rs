//! The capture façade.
//!
//! [`CaptureEngine`] ties the pipeline together: bounding box, zoom
//! selection, covering grid, concurrent fetch, mosaic assembly, and vertex
//! projection. One call, one composite raster.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbImage};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::coord::{GeoBoundingBox, GeoPoint};
use crate::fetch::{self, ProgressCallback};
use crate::grid::TileGrid;
use crate::mosaic::{self, MosaicMeta, TileStats};
use crate::project::{self, PixelPoint};
use crate::provider::{HttpClient, ReqwestTileClient, UrlTemplate};
use crate::zoom;

use super::error::CaptureError;

/// One capture: a polygon and the tile server to image it from.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Polygon vertices in lon/lat order, at least three.
    pub vertices: Vec<GeoPoint>,
    /// Tile URL template with `{x}`, `{y}`, `{z}` placeholders.
    pub template: String,
}

/// Everything a capture produces.
#[derive(Debug)]
pub struct CaptureResult {
    /// Composite raster covering the polygon's tile grid.
    pub image: RgbImage,
    /// Raster geometry: grid origin, extent, zoom.
    pub meta: MosaicMeta,
    /// Fetched vs placeholder tile counts.
    pub stats: TileStats,
    /// Geographic bounding box of the input polygon.
    pub bbox: GeoBoundingBox,
    /// Selected zoom level.
    pub zoom: u8,
    /// False when the tile cap forced an oversized minimum-zoom grid.
    pub within_cap: bool,
    /// True when the capture was cancelled and placeholders fill the gaps.
    pub cancelled: bool,
    /// Input vertices, echoed for record writing.
    pub vertices: Vec<GeoPoint>,
    /// Vertices in raster pixels, top-left origin.
    pub pixels_top_left: Vec<PixelPoint>,
    /// Vertices in raster pixels, bottom-left origin.
    pub pixels_bottom_left: Vec<PixelPoint>,
}

impl CaptureResult {
    /// PNG-encode the composite raster.
    pub fn png_bytes(&self) -> Result<Vec<u8>, CaptureError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| CaptureError::ImageEncode(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

/// Drives captures against a tile server.
///
/// Generic over the HTTP client so tests can script responses; production
/// code uses [`CaptureEngine::new`] and gets a [`ReqwestTileClient`].
pub struct CaptureEngine<C: HttpClient> {
    client: Arc<C>,
    config: EngineConfig,
}

impl CaptureEngine<ReqwestTileClient> {
    /// Engine with a real HTTP client built from `config`.
    pub fn new(config: EngineConfig) -> Result<Self, CaptureError> {
        let client = ReqwestTileClient::new(&config.user_agent, config.fetch.request_timeout)
            .map_err(CaptureError::ClientBuild)?;
        Ok(Self::with_client(Arc::new(client), config))
    }
}

impl<C: HttpClient + 'static> CaptureEngine<C> {
    /// Engine with a caller-supplied client.
    pub fn with_client(client: Arc<C>, config: EngineConfig) -> Self {
        Self { client, config }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a capture to completion with no cancellation or progress hookup.
    pub async fn capture(&self, request: &CaptureRequest) -> Result<CaptureResult, CaptureError> {
        self.capture_with(request, &CancellationToken::new(), None)
            .await
    }

    /// Run a capture.
    ///
    /// Cancellation degrades rather than aborts: unfetched tiles become
    /// placeholders and the result is returned with `cancelled` set.
    /// `progress` is invoked once per completed tile.
    #[instrument(skip_all, fields(vertices = request.vertices.len()))]
    pub async fn capture_with(
        &self,
        request: &CaptureRequest,
        cancel: &CancellationToken,
        progress: Option<&ProgressCallback>,
    ) -> Result<CaptureResult, CaptureError> {
        if request.vertices.len() < 3 {
            return Err(CaptureError::InvalidPolygon(request.vertices.len()));
        }
        let template = UrlTemplate::parse(&request.template)?;
        let bbox = GeoBoundingBox::from_points(&request.vertices)?;

        let selection = zoom::select_zoom(&bbox, &self.config.zoom)?;
        let grid = TileGrid::covering(&bbox, selection.zoom)?;
        if grid.tile_count() == 0 {
            return Err(CaptureError::EmptyTileGrid);
        }
        info!(
            zoom = selection.zoom,
            tiles = grid.tile_count(),
            within_cap = selection.within_cap,
            "capture started"
        );

        let outcomes = fetch::fetch_grid(
            Arc::clone(&self.client),
            &template,
            &grid,
            &self.config.fetch,
            cancel,
            progress,
        )
        .await;

        let (image, meta, stats) = mosaic::assemble(&grid, &outcomes);
        let (pixels_top_left, pixels_bottom_left) = project::project_ring(&request.vertices, &meta)?;

        let cancelled = cancel.is_cancelled();
        info!(
            width = meta.width,
            height = meta.height,
            fetched = stats.fetched,
            placeholders = stats.placeholders,
            cancelled,
            "capture finished"
        );

        Ok(CaptureResult {
            image,
            meta,
            stats,
            bbox,
            zoom: selection.zoom,
            within_cap: selection.within_cap,
            cancelled,
            vertices: request.vertices.clone(),
            pixels_top_left,
            pixels_bottom_left,
        })
    }

    /// Synchronous wrapper: builds a runtime and blocks on [`capture`](Self::capture).
    ///
    /// For callers without a Tokio runtime. Must not be called from async
    /// context.
    pub fn capture_blocking(&self, request: &CaptureRequest) -> Result<CaptureResult, CaptureError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CaptureError::RuntimeCreation(e.to_string()))?;
        runtime.block_on(self.capture(request))
    }
}
