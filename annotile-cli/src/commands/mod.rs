//! CLI command implementations.

pub mod capture;
pub mod common;
pub mod config;
pub mod servers;
