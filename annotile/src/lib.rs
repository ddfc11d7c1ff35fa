//! Annotile - Tile mosaic capture for polygon annotations
//!
//! This library turns a geographic polygon into a composite satellite or
//! map raster: it picks a zoom level under a tile budget, fetches the
//! covering slippy-map tiles concurrently, stitches them into one image,
//! and projects the polygon vertices into pixel space.

pub mod capture;
pub mod config;
pub mod coord;
pub mod fetch;
pub mod grid;
pub mod logging;
pub mod mosaic;
pub mod project;
pub mod provider;
pub mod zoom;
