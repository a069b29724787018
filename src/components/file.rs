use std::{fmt::Debug, path::Path};

use crate::{
    components::{raster::band::BandInfo, transforms::BandGeoTransform, DataType, RasterGrid},
    errors::Result,
};

/// Raster file opened for the time it takes to read its grid.
pub trait File<T: DataType>: Debug + Sized {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;
    fn description(&self) -> Result<String>;
    /// (width, height)
    fn shape(&self) -> (usize, usize);
    fn transform(&self) -> Result<BandGeoTransform>;
    /// Calibration of the first band, falling back
    /// to `no_data` when the band declares no sentinel.
    fn band_info(&self, no_data: f64) -> Result<BandInfo>;
    fn read_grid(self, no_data: f64) -> Result<RasterGrid<T>>;
}

/// Something the batch can turn into a grid, one image at a time.
pub trait ImageSource<T: DataType>: Send + Sync {
    /// Key of the image in the report.
    fn identifier(&self) -> String;
    fn load(&self) -> Result<RasterGrid<T>>;
}
