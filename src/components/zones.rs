use geo::{BoundingRect, Contains, Coord, Geometry, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::components::bounds::GeoBounds;

/// Geometry a zone is made of, seen only through
/// its bounding box and a containment test.
#[ambassador::delegatable_trait]
pub trait ZoneGeometry {
    /// `None` for empty geometries.
    fn bounds(&self) -> Option<GeoBounds>;
    /// Strict containment, boundary points are outside.
    fn contains_coord(&self, coord: Coord<f64>) -> bool;
}

impl ZoneGeometry for Polygon<f64> {
    fn bounds(&self) -> Option<GeoBounds> {
        self.bounding_rect().map(GeoBounds::from)
    }
    fn contains_coord(&self, coord: Coord<f64>) -> bool {
        self.contains(&Point::from(coord))
    }
}

impl ZoneGeometry for MultiPolygon<f64> {
    fn bounds(&self) -> Option<GeoBounds> {
        self.bounding_rect().map(GeoBounds::from)
    }
    fn contains_coord(&self, coord: Coord<f64>) -> bool {
        self.contains(&Point::from(coord))
    }
}

#[derive(ambassador::Delegate, Debug, Clone, PartialEq)]
#[delegate(ZoneGeometry)]
pub enum ZoneShape {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl From<Polygon<f64>> for ZoneShape {
    fn from(value: Polygon<f64>) -> Self {
        Self::Polygon(value)
    }
}

impl From<MultiPolygon<f64>> for ZoneShape {
    fn from(value: MultiPolygon<f64>) -> Self {
        Self::MultiPolygon(value)
    }
}

impl TryFrom<Geometry<f64>> for ZoneShape {
    type Error = Geometry<f64>;
    fn try_from(value: Geometry<f64>) -> std::result::Result<Self, Self::Error> {
        match value {
            Geometry::Polygon(polygon) => Ok(Self::Polygon(polygon)),
            Geometry::MultiPolygon(multi_polygon) => Ok(Self::MultiPolygon(multi_polygon)),
            Geometry::Rect(rect) => Ok(Self::Polygon(rect.to_polygon())),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Urban,
    Rural,
}

impl Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneKind::Urban => write!(f, "urban"),
            ZoneKind::Rural => write!(f, "rural"),
        }
    }
}

/// Polygons of one zone kind, in source order.
#[derive(Debug, Clone)]
pub struct Zones {
    pub kind: ZoneKind,
    pub shapes: Vec<ZoneShape>,
}

impl Zones {
    pub fn new(kind: ZoneKind, shapes: impl IntoIterator<Item = impl Into<ZoneShape>>) -> Self {
        Self {
            kind,
            shapes: shapes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneShape> {
        self.shapes.iter()
    }
}
