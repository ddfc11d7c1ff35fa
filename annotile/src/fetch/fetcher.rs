//! Concurrent tile retrieval with retry and placeholder fallback.
//!
//! The fetch is a bounded scatter/gather: one task per tile, at most
//! `min(max_workers, tile_count)` in flight, and a hard completion barrier.
//! The returned map always holds an outcome for every coordinate in the
//! grid, so the assembler never sees a partial grid.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use image::{imageops, RgbImage};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::outcome::{FetchFailure, FetchOutcome};
use super::progress::{FetchProgress, ProgressCallback};
use crate::coord::{TileCoord, TILE_SIZE};
use crate::grid::TileGrid;
use crate::provider::{HttpClient, HttpError, TileResponse, UrlTemplate};

/// Tunables for the per-request fetch pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound on concurrent tile requests.
    pub max_workers: usize,
    /// Total attempts per tile before substituting a placeholder.
    pub attempts: u32,
    /// Delay between attempts.
    pub retry_delay: Duration,
    /// Per-attempt timeout.
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_workers: 8,
            attempts: 3,
            retry_delay: Duration::from_millis(200),
            request_timeout: Duration::from_secs(12),
        }
    }
}

/// Fetches every tile in `grid`, producing one [`FetchOutcome`] per
/// coordinate.
///
/// Per-tile failures are retried and then degraded to placeholders; they
/// never abort the request. When `cancel` fires, no further attempts are
/// issued, in-flight tasks are aborted, and unfinished coordinates are
/// backfilled with placeholder outcomes carrying
/// [`FetchFailure::Cancelled`].
#[instrument(skip_all, fields(zoom = grid.zoom, tiles = grid.tile_count()))]
pub async fn fetch_grid<C>(
    client: Arc<C>,
    template: &UrlTemplate,
    grid: &TileGrid,
    config: &FetchConfig,
    cancel: &CancellationToken,
    progress: Option<&ProgressCallback>,
) -> HashMap<TileCoord, FetchOutcome>
where
    C: HttpClient + 'static,
{
    let total = grid.tile_count();
    let mut outcomes: HashMap<TileCoord, FetchOutcome> = HashMap::with_capacity(total as usize);

    let workers = config.max_workers.min(total as usize).max(1);
    let semaphore = Arc::new(Semaphore::new(workers));

    let mut tasks = JoinSet::new();
    for tile in grid.tiles() {
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let url = template.url_for(&tile);
        let config = config.clone();
        let token = cancel.clone();

        tasks.spawn(async move {
            let _permit = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return FetchOutcome::placeholder(tile, 0, FetchFailure::Cancelled);
                }
                permit = semaphore.acquire_owned() => permit,
            };
            fetch_tile(&*client, &url, tile, &config, &token).await
        });
    }

    let completed = Cell::new(0u64);
    let placeholders = Cell::new(0u64);

    let record = |outcomes: &mut HashMap<TileCoord, FetchOutcome>, outcome: FetchOutcome| {
        completed.set(completed.get() + 1);
        if outcome.placeholder {
            placeholders.set(placeholders.get() + 1);
        }
        outcomes.insert(outcome.coord, outcome);
        if let Some(callback) = progress {
            callback(FetchProgress {
                completed: completed.get(),
                total,
                placeholders: placeholders.get(),
            });
        }
    };

    // Gather until every task has reported or cancellation aborts the rest.
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(completed = completed.get(), total, "fetch cancelled, aborting remaining tiles");
                tasks.abort_all();
                break;
            }
            joined = tasks.join_next() => {
                match joined {
                    Some(Ok(outcome)) => record(&mut outcomes, outcome),
                    Some(Err(join_err)) => {
                        if !join_err.is_cancelled() {
                            warn!(error = %join_err, "tile task panicked");
                        }
                    }
                    None => break,
                }
            }
        }
    }

    // Drain tasks that finished before the abort landed.
    while let Some(joined) = tasks.join_next().await {
        if let Ok(outcome) = joined {
            record(&mut outcomes, outcome);
        }
    }

    // Completion barrier: aborted tiles still get an outcome slot.
    for tile in grid.tiles() {
        outcomes
            .entry(tile)
            .or_insert_with(|| FetchOutcome::placeholder(tile, 0, FetchFailure::Cancelled));
    }

    debug!(
        fetched = outcomes.values().filter(|o| !o.placeholder).count(),
        placeholders = outcomes.values().filter(|o| o.placeholder).count(),
        "fetch complete"
    );

    outcomes
}

/// Fetches one tile end-to-end: attempts, retry delays, placeholder fallback.
async fn fetch_tile<C: HttpClient>(
    client: &C,
    url: &str,
    tile: TileCoord,
    config: &FetchConfig,
    cancel: &CancellationToken,
) -> FetchOutcome {
    let mut last_error = FetchFailure::Cancelled;

    for attempt in 1..=config.attempts {
        if cancel.is_cancelled() {
            return FetchOutcome::placeholder(tile, attempt - 1, FetchFailure::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return FetchOutcome::placeholder(tile, attempt - 1, FetchFailure::Cancelled);
            }
            result = tokio::time::timeout(config.request_timeout, client.get(url)) => result,
        };

        match result {
            Ok(Ok(response)) => match decode_tile(&response) {
                Ok(pixels) => {
                    debug!(tile = %tile, attempt, "tile fetched");
                    return FetchOutcome::fetched(tile, pixels, attempt);
                }
                Err(error) => last_error = error,
            },
            Ok(Err(HttpError::Timeout)) => last_error = FetchFailure::Timeout,
            Ok(Err(error)) => last_error = FetchFailure::Network(error.to_string()),
            Err(_elapsed) => last_error = FetchFailure::Timeout,
        }

        if attempt < config.attempts {
            debug!(tile = %tile, attempt, error = %last_error, "tile attempt failed, retrying");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return FetchOutcome::placeholder(tile, attempt, FetchFailure::Cancelled);
                }
                _ = tokio::time::sleep(config.retry_delay) => {}
            }
        }
    }

    warn!(tile = %tile, error = %last_error, "tile failed after all attempts, using placeholder");
    FetchOutcome::placeholder(tile, config.attempts, last_error)
}

/// Validates and decodes one HTTP response into a 256×256 tile raster.
fn decode_tile(response: &TileResponse) -> Result<RgbImage, FetchFailure> {
    if response.status != 200 {
        return Err(FetchFailure::Status(response.status));
    }

    let content_type = response.content_type.as_deref().unwrap_or("");
    if !content_type.contains("image") {
        return Err(FetchFailure::NotAnImage(content_type.to_string()));
    }

    let decoded = image::load_from_memory(&response.body)
        .map_err(|e| FetchFailure::Decode(e.to_string()))?;

    let mut pixels = decoded.to_rgb8();
    if pixels.dimensions() != (TILE_SIZE, TILE_SIZE) {
        // Retina or odd-sized upstream tiles would misalign the paste grid.
        pixels = imageops::resize(&pixels, TILE_SIZE, TILE_SIZE, imageops::FilterType::Nearest);
    }

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::outcome::PLACEHOLDER_COLOR;
    use crate::provider::TileResponse;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted transport: returns a canned response and counts calls.
    struct ScriptedClient {
        response: Result<TileResponse, HttpError>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(response: Result<TileResponse, HttpError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for ScriptedClient {
        async fn get(&self, _url: &str) -> Result<TileResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn solid_png(r: u8, g: u8, b: u8) -> Vec<u8> {
        let tile = RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, image::Rgb([r, g, b]));
        let mut bytes = Vec::new();
        tile.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn test_grid() -> TileGrid {
        TileGrid {
            min_x: 10,
            min_y: 20,
            max_x: 11,
            max_y: 21,
            zoom: 15,
        }
    }

    fn fast_config() -> FetchConfig {
        FetchConfig {
            retry_delay: Duration::from_millis(1),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }

    fn template() -> UrlTemplate {
        UrlTemplate::parse("https://tiles.example.com/{z}/{x}/{y}.png").unwrap()
    }

    #[tokio::test]
    async fn test_all_tiles_fetched_on_success() {
        let client = Arc::new(ScriptedClient::new(Ok(TileResponse::image(
            "image/png",
            solid_png(10, 120, 10),
        ))));
        let grid = test_grid();

        let outcomes = fetch_grid(
            Arc::clone(&client),
            &template(),
            &grid,
            &fast_config(),
            &CancellationToken::new(),
            None,
        )
        .await;

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.values().all(|o| !o.placeholder));
        assert!(outcomes.values().all(|o| o.attempts == 1));
        assert_eq!(client.call_count(), 4);
    }

    #[tokio::test]
    async fn test_failing_server_degrades_to_placeholders() {
        let client = Arc::new(ScriptedClient::new(Ok(TileResponse {
            status: 503,
            content_type: Some("text/html".to_string()),
            body: bytes::Bytes::from_static(b"unavailable"),
        })));
        let grid = test_grid();

        let outcomes = fetch_grid(
            Arc::clone(&client),
            &template(),
            &grid,
            &fast_config(),
            &CancellationToken::new(),
            None,
        )
        .await;

        assert_eq!(outcomes.len(), 4);
        for outcome in outcomes.values() {
            assert!(outcome.placeholder);
            assert_eq!(outcome.attempts, 3);
            assert_eq!(outcome.last_error, Some(FetchFailure::Status(503)));
            assert_eq!(outcome.pixels.get_pixel(0, 0).0, PLACEHOLDER_COLOR);
        }
        // 4 tiles x 3 attempts
        assert_eq!(client.call_count(), 12);
    }

    #[tokio::test]
    async fn test_wrong_content_type_degrades_to_placeholder() {
        let client = Arc::new(ScriptedClient::new(Ok(TileResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: bytes::Bytes::from_static(b"{}"),
        })));
        let grid = TileGrid {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            zoom: 4,
        };

        let outcomes = fetch_grid(
            client,
            &template(),
            &grid,
            &fast_config(),
            &CancellationToken::new(),
            None,
        )
        .await;

        let outcome = outcomes.values().next().unwrap();
        assert!(outcome.placeholder);
        assert!(matches!(
            outcome.last_error,
            Some(FetchFailure::NotAnImage(_))
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body_degrades_to_placeholder() {
        let client = Arc::new(ScriptedClient::new(Ok(TileResponse::image(
            "image/png",
            vec![0xDE, 0xAD, 0xBE, 0xEF],
        ))));
        let grid = TileGrid {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            zoom: 4,
        };

        let outcomes = fetch_grid(
            client,
            &template(),
            &grid,
            &fast_config(),
            &CancellationToken::new(),
            None,
        )
        .await;

        let outcome = outcomes.values().next().unwrap();
        assert!(outcome.placeholder);
        assert!(matches!(outcome.last_error, Some(FetchFailure::Decode(_))));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_issues_no_requests() {
        let client = Arc::new(ScriptedClient::new(Ok(TileResponse::image(
            "image/png",
            solid_png(0, 0, 0),
        ))));
        let grid = test_grid();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcomes = fetch_grid(
            Arc::clone(&client),
            &template(),
            &grid,
            &fast_config(),
            &cancel,
            None,
        )
        .await;

        // Barrier still holds: every coordinate has a (placeholder) outcome
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.values().all(|o| o.placeholder));
        assert!(outcomes
            .values()
            .all(|o| o.last_error == Some(FetchFailure::Cancelled)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_tile_resized_to_tile_dimension() {
        let big = RgbImage::from_pixel(512, 512, image::Rgb([50, 60, 70]));
        let mut bytes = Vec::new();
        big.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let client = Arc::new(ScriptedClient::new(Ok(TileResponse::image(
            "image/png", bytes,
        ))));
        let grid = TileGrid {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            zoom: 4,
        };

        let outcomes = fetch_grid(
            client,
            &template(),
            &grid,
            &fast_config(),
            &CancellationToken::new(),
            None,
        )
        .await;

        let outcome = outcomes.values().next().unwrap();
        assert!(!outcome.placeholder);
        assert_eq!(outcome.pixels.dimensions(), (TILE_SIZE, TILE_SIZE));
    }

    #[tokio::test]
    async fn test_progress_callback_reports_every_tile() {
        let client = Arc::new(ScriptedClient::new(Ok(TileResponse::image(
            "image/png",
            solid_png(1, 2, 3),
        ))));
        let grid = test_grid();

        let seen: Arc<Mutex<Vec<FetchProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |p| sink.lock().unwrap().push(p));

        fetch_grid(
            client,
            &template(),
            &grid,
            &fast_config(),
            &CancellationToken::new(),
            Some(&callback),
        )
        .await;

        let snapshots = seen.lock().unwrap();
        assert_eq!(snapshots.len(), 4);
        assert!(snapshots.iter().all(|p| p.total == 4));
        assert_eq!(snapshots.last().unwrap().completed, 4);
        assert_eq!(snapshots.last().unwrap().placeholders, 0);
    }

    #[test]
    fn test_decode_tile_rejects_missing_content_type() {
        let response = TileResponse {
            status: 200,
            content_type: None,
            body: bytes::Bytes::from_static(b"data"),
        };

        assert!(matches!(
            decode_tile(&response),
            Err(FetchFailure::NotAnImage(_))
        ));
    }
}
