//! Fetch progress reporting.
//!
//! The fetcher invokes an optional callback after each outcome is recorded,
//! so an interactive caller can render a progress bar without polling.

/// Snapshot of fetch progress for one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// Tiles with a recorded outcome so far.
    pub completed: u64,
    /// Total tiles in the grid.
    pub total: u64,
    /// Outcomes that are placeholders so far.
    pub placeholders: u64,
}

/// Callback invoked after each tile outcome is recorded.
pub type ProgressCallback = Box<dyn Fn(FetchProgress) + Send + Sync>;
