use geo::{AffineTransform, Coord};
use shrinkwraprs::Shrinkwrap;

use crate::errors::{Result, UhiError};

/// Pixel (col, row) to geo (x, y) transform of a raster band.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct BandGeoTransform(AffineTransform);

impl BandGeoTransform {
    pub fn new(a: f64, b: f64, xoff: f64, d: f64, e: f64, yoff: f64) -> Self {
        Self(AffineTransform::new(a, b, xoff, d, e, yoff))
    }

    /// From GDAL ordering `[xoff, a, b, yoff, d, e]`.
    pub fn from_gdal(gdal_transform: [f64; 6]) -> Self {
        Self::new(
            gdal_transform[1],
            gdal_transform[2],
            gdal_transform[0],
            gdal_transform[4],
            gdal_transform[5],
            gdal_transform[3],
        )
    }

    /// North up grid with top left corner at `origin`
    /// and square cells of `cell_size`.
    pub fn north_up(origin: (f64, f64), cell_size: f64) -> Self {
        Self::new(cell_size, 0., origin.0, 0., -cell_size, origin.1)
    }

    pub fn inverse(&self) -> Result<GeoBandTransform> {
        self.0
            .inverse()
            .map(GeoBandTransform)
            .ok_or(UhiError::NonInvertibleTransform)
    }
}

/// Geo (x, y) to fractional pixel (col, row) transform.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct GeoBandTransform(AffineTransform);

impl GeoBandTransform {
    pub fn pixel(&self, coord: Coord<f64>) -> Coord<f64> {
        self.0.apply(coord)
    }
}
