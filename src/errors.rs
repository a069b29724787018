use crate::components::zones::ZoneKind;

pub type Result<T> = std::result::Result<T, UhiError>;

#[derive(thiserror::Error, Debug)]
pub enum UhiError {
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    WalkError(#[from] walkdir::Error),
    #[error("Polygon bounding box has zero area ({width} x {height})")]
    DegeneratePolygon { width: f64, height: f64 },
    #[error("Sampling exhausted after {attempts} attempts: accepted {accepted} of {requested} points")]
    SamplingExhausted {
        requested: usize,
        accepted: usize,
        attempts: usize,
    },
    #[error("Coordinate ({x}, {y}) is outside of raster extent")]
    OutOfBounds { x: f64, y: f64 },
    #[error("All {points} {zone} points fall outside of raster extent, check coordinate systems")]
    ExtentMismatch { zone: ZoneKind, points: usize },
    #[error("Failed to load image {image}: {source}")]
    ImageLoadFailure {
        image: String,
        #[source]
        source: Box<UhiError>,
    },
    #[error("Raster transform is not invertible")]
    NonInvertibleTransform,
    #[error("Buffer of length {actual} does not match shape of length {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("There is no intersection between geometries")]
    NoIntersection,
    #[error("No polygons found in {0}")]
    NoZones(String),
}

impl UhiError {
    /// Errors that point at misaligned inputs rather than missing data.
    pub fn is_systemic(&self) -> bool {
        match self {
            UhiError::ExtentMismatch { .. } => true,
            UhiError::ImageLoadFailure { source, .. } => source.is_systemic(),
            _ => false,
        }
    }
}
