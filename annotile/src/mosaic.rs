//! Composite raster assembly.
//!
//! Pastes fetched tiles into their grid positions. Regions are disjoint per
//! tile, so paste order is irrelevant; pasting runs sequentially here.

use std::collections::HashMap;

use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};

use crate::coord::{TileCoord, TILE_SIZE};
use crate::fetch::{placeholder_tile, FetchOutcome};
use crate::grid::TileGrid;

/// Placement metadata for one composite raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicMeta {
    /// Westernmost tile column of the grid.
    pub min_x: u32,
    /// Northernmost tile row of the grid.
    pub min_y: u32,
    /// Tile columns in the grid.
    pub tile_x_count: u32,
    /// Tile rows in the grid.
    pub tile_y_count: u32,
    /// Zoom level of the source tiles.
    pub zoom: u8,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
}

/// Real versus placeholder split for one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileStats {
    /// Tiles in the grid.
    pub total: u64,
    /// Tiles filled with upstream imagery.
    pub fetched: u64,
    /// Tiles filled with the placeholder color.
    pub placeholders: u64,
}

/// Assembles the tiles of `grid` into one composite raster.
///
/// Any grid coordinate missing from `outcomes` (impossible via the public
/// fetch path, possible when driven directly) is filled with the
/// placeholder color rather than left black.
pub fn assemble(
    grid: &TileGrid,
    outcomes: &HashMap<TileCoord, FetchOutcome>,
) -> (RgbImage, MosaicMeta, TileStats) {
    let width = grid.width() * TILE_SIZE;
    let height = grid.height() * TILE_SIZE;
    let mut canvas = RgbImage::new(width, height);

    let mut stats = TileStats {
        total: grid.tile_count(),
        ..Default::default()
    };

    for tile in grid.tiles() {
        let x_px = ((tile.x - grid.min_x) * TILE_SIZE) as i64;
        let y_px = ((tile.y - grid.min_y) * TILE_SIZE) as i64;

        match outcomes.get(&tile) {
            Some(outcome) => {
                imageops::replace(&mut canvas, &outcome.pixels, x_px, y_px);
                if outcome.placeholder {
                    stats.placeholders += 1;
                } else {
                    stats.fetched += 1;
                }
            }
            None => {
                imageops::replace(&mut canvas, &placeholder_tile(), x_px, y_px);
                stats.placeholders += 1;
            }
        }
    }

    let meta = MosaicMeta {
        min_x: grid.min_x,
        min_y: grid.min_y,
        tile_x_count: grid.width(),
        tile_y_count: grid.height(),
        zoom: grid.zoom,
        width,
        height,
    };

    (canvas, meta, stats)
}
