pub mod band;

use geo::Coord;
use log::info;
use std::fmt::Debug;

use crate::{
    buffer::Buffer,
    components::{
        bounds::{Bounds, GeoBounds, PixelBounds},
        raster::band::BandInfo,
        transforms::{BandGeoTransform, GeoBandTransform},
        DataType,
    },
    errors::{Result, UhiError},
};

/// Single band raster held in memory
/// with its georeferencing and calibration.
pub struct RasterGrid<T: DataType> {
    description: String,
    cells: Buffer<T, 2>,
    transform: BandGeoTransform,
    /// Cached inverse of `transform`.
    inverse: GeoBandTransform,
    pub band: BandInfo,
}

impl<T: DataType> Debug for RasterGrid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [height, width] = self.cells.shape();
        f.debug_struct("RasterGrid")
            .field("description", &self.description)
            .field("shape", &(width, height))
            .field("geo_bounds", &self.geo_bounds())
            .field("geo_shape", &self.geo_bounds().shape())
            .field("band", &self.band)
            .finish()
    }
}

impl<T: DataType> RasterGrid<T> {
    pub fn new(
        description: impl Into<String>,
        cells: Buffer<T, 2>,
        transform: BandGeoTransform,
        band: BandInfo,
    ) -> Result<Self> {
        let inverse = transform.inverse()?;
        let grid = Self {
            description: description.into(),
            cells,
            transform,
            inverse,
            band,
        };
        info!("new {grid:?}");
        Ok(grid)
    }

    /// Grid where every cell holds `value`.
    pub fn constant(
        shape: (usize, usize),
        value: T,
        transform: BandGeoTransform,
        band: BandInfo,
    ) -> Result<Self> {
        let (width, height) = shape;
        Self::new(
            "constant",
            Buffer::filled([height, width], value),
            transform,
            band,
        )
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// (width, height)
    pub fn shape(&self) -> (usize, usize) {
        let [height, width] = self.cells.shape();
        (width, height)
    }

    pub fn pixel_bounds(&self) -> PixelBounds {
        PixelBounds::new((0, 0), self.shape())
    }

    /// Extent covered by the grid in geo space.
    pub fn geo_bounds(&self) -> GeoBounds {
        let (width, height) = self.shape();
        let corners = [(0., 0.), (width as f64, 0.), (0., height as f64)]
            .into_iter()
            .chain([(width as f64, height as f64)])
            .map(|corner| self.transform.apply(Coord::from(corner)));
        let (mut min, mut max) = (
            Coord {
                x: f64::INFINITY,
                y: f64::INFINITY,
            },
            Coord {
                x: f64::NEG_INFINITY,
                y: f64::NEG_INFINITY,
            },
        );
        for corner in corners {
            min = Coord {
                x: min.x.min(corner.x),
                y: min.y.min(corner.y),
            };
            max = Coord {
                x: max.x.max(corner.x),
                y: max.y.max(corner.y),
            };
        }
        GeoBounds::new(min, max)
    }

    /// Cell index `(row, col)` containing `(x, y)`.
    pub fn coordinate_to_index(&self, x: f64, y: f64) -> Result<(usize, usize)> {
        self.pixel_bounds()
            .index_of(self.inverse.pixel(Coord { x, y }))
            .ok_or(UhiError::OutOfBounds { x, y })
    }

    pub fn raw_value(&self, row: usize, col: usize) -> Option<T> {
        self.cells.get(row, col)
    }

    /// Calibrated value at `coord`, `None` for no-data cells.
    pub fn read_value(&self, coord: Coord<f64>) -> Result<Option<f64>> {
        let (row, col) = self.coordinate_to_index(coord.x, coord.y)?;
        let raw = self
            .raw_value(row, col)
            .ok_or(UhiError::OutOfBounds {
                x: coord.x,
                y: coord.y,
            })?;
        Ok(self.band.calibrate(raw))
    }
}
