mod point;
mod zone;

pub use point::PointSampler;
pub use zone::{ZoneSampleResult, ZoneSampler};
