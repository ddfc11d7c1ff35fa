//! Rectangular tile grids covering a geographic bounding box.
//!
//! A grid is the full cartesian product of tile coordinates between its
//! corner indices, not just the tiles a polygon touches, so a stitched
//! canvas is always a clean rectangle.

use crate::coord::{self, CoordError, GeoBoundingBox, GeoPoint, TileCoord};

/// Inclusive rectangle of tile indices at a single zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    /// Westernmost tile column
    pub min_x: u32,
    /// Northernmost tile row
    pub min_y: u32,
    /// Easternmost tile column
    pub max_x: u32,
    /// Southernmost tile row
    pub max_y: u32,
    /// Zoom level of every tile in the grid
    pub zoom: u8,
}

impl TileGrid {
    /// Computes the grid covering `bbox` at `zoom`.
    ///
    /// The corners come from the tiles containing the box's northwest and
    /// southeast points. A degenerate box (a single point, or one thinner
    /// than a tile) collapses both corners onto the same tile, so the grid
    /// is never empty; if the corner indices ever come out inverted the
    /// grid falls back to the single tile containing the box centroid.
    ///
    /// # Errors
    ///
    /// Returns an error if the box corners are outside geographic range or
    /// the zoom is above the supported maximum.
    pub fn covering(bbox: &GeoBoundingBox, zoom: u8) -> Result<Self, CoordError> {
        let nw = coord::point_to_tile(GeoPoint::new(bbox.min_lon, bbox.max_lat), zoom)?;
        let se = coord::point_to_tile(GeoPoint::new(bbox.max_lon, bbox.min_lat), zoom)?;

        if se.x < nw.x || se.y < nw.y {
            let center = coord::point_to_tile(bbox.centroid(), zoom)?;
            return Ok(Self {
                min_x: center.x,
                min_y: center.y,
                max_x: center.x,
                max_y: center.y,
                zoom,
            });
        }

        Ok(Self {
            min_x: nw.x,
            min_y: nw.y,
            max_x: se.x,
            max_y: se.y,
            zoom,
        })
    }

    /// Number of tile columns.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Number of tile rows.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Total tiles in the grid.
    pub fn tile_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Whether the grid contains the given tile coordinate.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        tile.zoom == self.zoom
            && (self.min_x..=self.max_x).contains(&tile.x)
            && (self.min_y..=self.max_y).contains(&tile.y)
    }

    /// Iterates over every tile in the grid in row-major order.
    pub fn tiles(&self) -> GridTilesIterator {
        GridTilesIterator {
            grid: *self,
            next_x: self.min_x,
            next_y: self.min_y,
            done: false,
        }
    }
}

/// Row-major iterator over the tiles of a [`TileGrid`].
#[derive(Debug, Clone)]
pub struct GridTilesIterator {
    grid: TileGrid,
    next_x: u32,
    next_y: u32,
    done: bool,
}

impl Iterator for GridTilesIterator {
    type Item = TileCoord;

    fn next(&mut self) -> Option<TileCoord> {
        if self.done {
            return None;
        }

        let tile = TileCoord {
            x: self.next_x,
            y: self.next_y,
            zoom: self.grid.zoom,
        };

        if self.next_x < self.grid.max_x {
            self.next_x += 1;
        } else if self.next_y < self.grid.max_y {
            self.next_x = self.grid.min_x;
            self.next_y += 1;
        } else {
            self.done = true;
        }

        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_bbox() -> GeoBoundingBox {
        GeoBoundingBox {
            min_lon: 67.0011,
            min_lat: 24.8607,
            max_lon: 67.0111,
            max_lat: 24.8707,
        }
    }

    #[test]
    fn test_covering_grid_is_ordered() {
        let grid = TileGrid::covering(&small_bbox(), 16).unwrap();
        assert!(grid.max_x >= grid.min_x);
        assert!(grid.max_y >= grid.min_y);
        assert_eq!(grid.zoom, 16);
    }

    #[test]
    fn test_degenerate_bbox_yields_single_tile() {
        let bbox = GeoBoundingBox {
            min_lon: 10.0,
            min_lat: 50.0,
            max_lon: 10.0,
            max_lat: 50.0,
        };

        let grid = TileGrid::covering(&bbox, 15).unwrap();
        assert_eq!(grid.tile_count(), 1);

        let center = coord::point_to_tile(GeoPoint::new(10.0, 50.0), 15).unwrap();
        assert!(grid.contains(&center));
    }

    #[test]
    fn test_grid_contains_all_bbox_corner_tiles() {
        let bbox = small_bbox();
        let grid = TileGrid::covering(&bbox, 17).unwrap();

        for (lon, lat) in [
            (bbox.min_lon, bbox.min_lat),
            (bbox.min_lon, bbox.max_lat),
            (bbox.max_lon, bbox.min_lat),
            (bbox.max_lon, bbox.max_lat),
        ] {
            let tile = coord::point_to_tile(GeoPoint::new(lon, lat), 17).unwrap();
            assert!(grid.contains(&tile), "grid should contain tile {}", tile);
        }
    }

    #[test]
    fn test_tile_count_matches_dimensions() {
        let grid = TileGrid {
            min_x: 100,
            min_y: 200,
            max_x: 103,
            max_y: 202,
            zoom: 14,
        };

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tile_count(), 12);
    }

    #[test]
    fn test_tiles_iterator_row_major() {
        let grid = TileGrid {
            min_x: 5,
            min_y: 10,
            max_x: 6,
            max_y: 11,
            zoom: 8,
        };

        let tiles: Vec<_> = grid.tiles().map(|t| (t.x, t.y)).collect();
        assert_eq!(tiles, vec![(5, 10), (6, 10), (5, 11), (6, 11)]);
    }

    #[test]
    fn test_tiles_iterator_single_tile() {
        let grid = TileGrid {
            min_x: 7,
            min_y: 7,
            max_x: 7,
            max_y: 7,
            zoom: 3,
        };

        let tiles: Vec<_> = grid.tiles().collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].x, 7);
        assert_eq!(tiles[0].y, 7);
    }

    #[test]
    fn test_contains_rejects_other_zoom() {
        let grid = TileGrid {
            min_x: 0,
            min_y: 0,
            max_x: 1,
            max_y: 1,
            zoom: 10,
        };

        let tile = TileCoord {
            x: 0,
            y: 0,
            zoom: 11,
        };
        assert!(!grid.contains(&tile));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_grid_never_empty(
                lon in -179.0..179.0_f64,
                lat in -84.0..84.0_f64,
                dlon in 0.0..0.5_f64,
                dlat in 0.0..0.5_f64,
                zoom in 0u8..=19
            ) {
                let bbox = GeoBoundingBox {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: (lon + dlon).min(180.0),
                    max_lat: (lat + dlat).min(85.0),
                };

                let grid = TileGrid::covering(&bbox, zoom)?;
                prop_assert!(grid.tile_count() >= 1);
            }

            #[test]
            fn test_iterator_yields_tile_count(
                min_x in 0u32..100,
                min_y in 0u32..100,
                w in 1u32..8,
                h in 1u32..8
            ) {
                let grid = TileGrid {
                    min_x,
                    min_y,
                    max_x: min_x + w - 1,
                    max_y: min_y + h - 1,
                    zoom: 12,
                };

                let count = grid.tiles().count() as u64;
                prop_assert_eq!(count, grid.tile_count());
            }

            #[test]
            fn test_iterator_tiles_all_contained(
                min_x in 0u32..50,
                min_y in 0u32..50,
                w in 1u32..6,
                h in 1u32..6
            ) {
                let grid = TileGrid {
                    min_x,
                    min_y,
                    max_x: min_x + w - 1,
                    max_y: min_y + h - 1,
                    zoom: 10,
                };

                for tile in grid.tiles() {
                    prop_assert!(grid.contains(&tile));
                }
            }
        }
    }
}
