//! Concurrent tile fetching: bounded scatter/gather with retry and
//! placeholder fallback.

mod fetcher;
mod outcome;
mod progress;

pub use fetcher::{fetch_grid, FetchConfig};
pub use outcome::{placeholder_tile, FetchFailure, FetchOutcome, PLACEHOLDER_COLOR};
pub use progress::{FetchProgress, ProgressCallback};
