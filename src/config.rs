use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{components::raster::band::DEFAULT_NO_DATA, errors::Result};

/// What happens to an image when one of its
/// polygons cannot be sampled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonFailurePolicy {
    /// The image is recorded as failed.
    #[default]
    AbortImage,
    /// The polygon contributes no points.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub points_per_polygon: usize,
    /// Candidate draws allowed per requested point,
    /// `None` retries until enough points are accepted.
    pub max_attempts_per_point: Option<usize>,
    /// Base seed, image `i` samples with `seed + i`.
    pub seed: Option<u64>,
    pub polygon_failure: PolygonFailurePolicy,
    /// Sentinel for rasters that declare none.
    pub no_data: f64,
    pub parallel: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            points_per_polygon: 500,
            max_attempts_per_point: Some(10_000),
            seed: None,
            polygon_failure: PolygonFailurePolicy::default(),
            no_data: DEFAULT_NO_DATA,
            parallel: true,
        }
    }
}

impl SamplingConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
