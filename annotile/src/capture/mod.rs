//! Capture façade: one entry point that runs the whole pipeline and the
//! record/naming helpers for persisting its output.

mod engine;
mod error;
pub mod naming;
mod record;

pub use engine::{CaptureEngine, CaptureRequest, CaptureResult};
pub use error::CaptureError;
pub use record::{CaptureRecord, ImageMeta};
