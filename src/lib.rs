pub mod batch;
mod buffer;
pub mod components;
pub mod config;
pub mod discovery;
mod errors;
pub mod export;
mod intersection;
pub mod report;
pub mod sampling;
pub mod uhi;

pub use batch::{BatchOutcome, BatchRunner, ImageSample};
pub use buffer::Buffer;
pub use components::engines::gdal_engine;
pub use config::{PolygonFailurePolicy, SamplingConfig};
pub use errors::{Result, UhiError};
pub use report::{Describe, ImageResult, Report};
pub use uhi::UhiSummary;
