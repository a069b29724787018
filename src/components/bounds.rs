use geo::{Coord, CoordNum, Rect};
use shrinkwraprs::Shrinkwrap;

use crate::{errors::Result, intersection::Intersection};

pub trait Bounds {
    type T: CoordNum;

    fn rect(&self) -> &Rect<Self::T>;

    /// (width, height)
    fn shape(&self) -> Coord<Self::T> {
        self.rect().max() - self.rect().min()
    }
}

/// Axis aligned bounds in the shared coordinate space
/// of zones and raster georeferencing.
#[derive(Shrinkwrap, Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds(Rect<f64>);

impl Bounds for GeoBounds {
    type T = f64;
    fn rect(&self) -> &Rect<f64> {
        &self.0
    }
}

impl From<Rect<f64>> for GeoBounds {
    fn from(value: Rect<f64>) -> Self {
        Self(value)
    }
}

impl Intersection for GeoBounds {
    type Output = GeoBounds;
    fn intersection(&self, rhs: &Self) -> Result<Self::Output> {
        Ok(GeoBounds(self.0.intersection(&rhs.0)?))
    }
}

impl GeoBounds {
    pub fn new(min: impl Into<Coord<f64>>, max: impl Into<Coord<f64>>) -> Self {
        Self(Rect::new::<Coord<f64>>(min.into(), max.into()))
    }

    /// A zero (or non finite) side, nothing can be sampled from it.
    pub fn is_degenerate(&self) -> bool {
        let side = |length: f64| length.is_finite() && length > 0.;
        !(side(self.0.width()) && side(self.0.height()))
    }

    pub fn overlaps(&self, other: &GeoBounds) -> bool {
        self.intersection(other).is_ok()
    }
}

/// Pixel bounds of a raster grid.
///
/// `min` is the top left pixel, `max` is exclusive, so
/// the shape is `(width, height)` a.k.a. (columns, rows).
#[derive(Shrinkwrap, Clone, Copy, Debug, PartialEq)]
pub struct PixelBounds(Rect<usize>);

impl Bounds for PixelBounds {
    type T = usize;
    fn rect(&self) -> &Rect<usize> {
        &self.0
    }
}

impl PixelBounds {
    pub fn new(offset: (usize, usize), shape: (usize, usize)) -> Self {
        let offset = Coord::from(offset);
        let max = offset + Coord::from(shape);
        Self(Rect::new(offset, max))
    }

    /// Index as (row, col) if the fractional pixel coordinate falls inside.
    pub fn index_of(&self, pixel: Coord<f64>) -> Option<(usize, usize)> {
        let (col, row) = (pixel.x.floor(), pixel.y.floor());
        if !(col.is_finite() && row.is_finite()) {
            return None;
        }
        let (min, max) = (self.0.min(), self.0.max());
        if col < min.x as f64 || row < min.y as f64 || col >= max.x as f64 || row >= max.y as f64
        {
            return None;
        }
        Some((row as usize, col as usize))
    }
}
