pub mod bounds;
pub mod engines;
pub mod file;
pub mod raster;
pub mod transforms;
pub mod zones;

pub use bounds::{GeoBounds, PixelBounds};
pub use file::{File, ImageSource};
pub use raster::{band::BandInfo, RasterGrid};
pub use transforms::BandGeoTransform;
pub use zones::{ZoneGeometry, ZoneKind, ZoneShape, Zones};

use num_traits::{AsPrimitive, Num};
use std::fmt::Debug;

/// Raw cell type of a raster band.
pub trait DataType: Num + Copy + Debug + Send + Sync + AsPrimitive<f64> + 'static {}

impl<T: Num + Copy + Debug + Send + Sync + AsPrimitive<f64> + 'static> DataType for T {}
