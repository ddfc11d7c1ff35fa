//! The `capture` command: polygon in, PNG mosaic plus JSON record out.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use annotile::capture::{naming, CaptureEngine, CaptureError, CaptureRecord, CaptureRequest};
use annotile::config::Settings;
use annotile::coord::GeoPoint;
use annotile::fetch::ProgressCallback;
use annotile::zoom::CapPolicy;

use crate::commands::common;
use crate::error::CliError;

/// Arguments for the capture command.
#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Polygon vertex as LON,LAT decimal degrees (repeat at least 3 times)
    #[arg(long = "vertex", value_name = "LON,LAT")]
    pub vertices: Vec<String>,

    /// JSON file holding the polygon as [[lon, lat], ...]
    #[arg(long, value_name = "FILE", conflicts_with = "vertices")]
    pub vertices_file: Option<PathBuf>,

    /// Capture name, used in output filenames and the record
    #[arg(long)]
    pub name: String,

    /// Tile server key (see `annotile servers`)
    #[arg(long, default_value = "esri")]
    pub server: String,

    /// Raw URL template with {x}, {y} and {z} placeholders (overrides --server)
    #[arg(long)]
    pub template: Option<String>,

    /// Annotation category for the record
    #[arg(long, default_value = "rooftop")]
    pub category: String,

    /// Directory the PNG and JSON record are written to
    #[arg(long, default_value = "captures")]
    pub output_dir: PathBuf,

    /// Preferred zoom level (overrides config)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Maximum tiles per capture (overrides config)
    #[arg(long)]
    pub tile_cap: Option<u64>,

    /// Fail when the cap is exceeded instead of falling back to minimum zoom
    #[arg(long)]
    pub strict_cap: bool,
}

/// Run a capture end to end: fetch, assemble, write PNG and record.
pub fn run(args: CaptureArgs, mut settings: Settings) -> Result<(), CliError> {
    let vertices = parse_vertices(&args)?;

    if let Some(zoom) = args.zoom {
        settings.engine.zoom.preferred = zoom;
        if settings.engine.zoom.minimum > zoom {
            settings.engine.zoom.minimum = zoom;
        }
    }
    if let Some(cap) = args.tile_cap {
        settings.engine.zoom.tile_cap = cap;
    }
    if args.strict_cap {
        settings.engine.zoom.cap_policy = CapPolicy::Fail;
    }

    let template = common::resolve_template(&settings, &args.server, args.template.as_deref());
    let server_label = match args.template {
        Some(_) => "custom".to_string(),
        None => args.server.clone(),
    };

    // Ctrl-C degrades the capture to placeholders instead of killing it.
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} tiles ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let bar_in_callback = bar.clone();
    let progress: ProgressCallback = Box::new(move |p| {
        if bar_in_callback.length() != Some(p.total) {
            bar_in_callback.set_length(p.total);
        }
        bar_in_callback.set_position(p.completed);
        bar_in_callback.set_message(format!("{} placeholders", p.placeholders));
    });

    let engine = CaptureEngine::new(settings.engine.clone())?;
    let request = CaptureRequest {
        vertices,
        template,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Capture(CaptureError::RuntimeCreation(e.to_string())))?;
    let result = runtime.block_on(engine.capture_with(&request, &cancel, Some(&progress)))?;
    bar.finish_and_clear();

    let timestamp = naming::timestamp();
    let image_name = naming::image_filename(&timestamp, &args.name, result.zoom);
    let record_name = naming::record_filename(&timestamp, &args.name);

    fs::create_dir_all(&args.output_dir).map_err(|error| CliError::FileWrite {
        path: args.output_dir.display().to_string(),
        error,
    })?;

    let image_path = args.output_dir.join(&image_name);
    let png = result.png_bytes()?;
    fs::write(&image_path, png).map_err(|error| CliError::FileWrite {
        path: image_path.display().to_string(),
        error,
    })?;

    let color = settings.palette.color_for(&args.category).to_string();
    let record = CaptureRecord::new(
        &result,
        &args.name,
        &args.category,
        &color,
        &server_label,
        &timestamp,
        &image_name,
    );
    let record_path = args.output_dir.join(&record_name);
    let json = record
        .to_json_pretty()
        .map_err(|e| CliError::Capture(CaptureError::ImageEncode(e.to_string())))?;
    fs::write(&record_path, json).map_err(|error| CliError::FileWrite {
        path: record_path.display().to_string(),
        error,
    })?;

    if !result.within_cap {
        eprintln!(
            "Note: tile cap exceeded at every zoom; captured {} tiles at minimum zoom {}.",
            result.stats.total, result.zoom
        );
    }
    if result.cancelled {
        eprintln!(
            "Capture interrupted: {} of {} tiles are gray placeholders.",
            result.stats.placeholders, result.stats.total
        );
    } else if result.stats.placeholders > 0 {
        eprintln!(
            "Warning: {} of {} tiles failed and were filled with placeholders.",
            result.stats.placeholders, result.stats.total
        );
    }

    println!("{}", image_path.display());
    println!("{}", record_path.display());

    Ok(())
}

/// Vertices from repeated `--vertex LON,LAT` flags or a JSON file.
fn parse_vertices(args: &CaptureArgs) -> Result<Vec<GeoPoint>, CliError> {
    if let Some(path) = &args.vertices_file {
        let raw = fs::read_to_string(path)
            .map_err(|e| CliError::Vertices(format!("cannot read '{}': {}", path.display(), e)))?;
        let pairs: Vec<(f64, f64)> = serde_json::from_str(&raw)
            .map_err(|e| CliError::Vertices(format!("bad JSON in '{}': {}", path.display(), e)))?;
        return Ok(pairs
            .into_iter()
            .map(|(lon, lat)| GeoPoint::new(lon, lat))
            .collect());
    }

    args.vertices.iter().map(|s| parse_vertex(s)).collect()
}

fn parse_vertex(s: &str) -> Result<GeoPoint, CliError> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| CliError::Vertices(format!("'{}' is not LON,LAT", s)))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| CliError::Vertices(format!("'{}' has a non-numeric longitude", s)))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| CliError::Vertices(format!("'{}' has a non-numeric latitude", s)))?;
    Ok(GeoPoint::new(lon, lat))
}
