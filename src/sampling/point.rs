use geo::Coord;
use rand::Rng;

use crate::{
    components::zones::ZoneGeometry,
    errors::{Result, UhiError},
};

/// Rejection sampler drawing uniform points inside a geometry.
#[derive(Debug, Clone, Copy)]
pub struct PointSampler {
    max_attempts_per_point: Option<usize>,
}

impl Default for PointSampler {
    fn default() -> Self {
        Self::bounded(10_000)
    }
}

impl PointSampler {
    /// At most `max_attempts_per_point * count` candidates per call.
    pub fn bounded(max_attempts_per_point: usize) -> Self {
        Self {
            max_attempts_per_point: Some(max_attempts_per_point),
        }
    }

    /// Draws until enough candidates are accepted.
    /// Only terminates for geometries with a non zero area.
    pub fn unbounded() -> Self {
        Self {
            max_attempts_per_point: None,
        }
    }

    pub fn new(max_attempts_per_point: Option<usize>) -> Self {
        Self {
            max_attempts_per_point,
        }
    }

    /// `count` points strictly inside `geometry`, in acceptance order.
    pub fn sample<G, R>(&self, geometry: &G, count: usize, rng: &mut R) -> Result<Vec<Coord<f64>>>
    where
        G: ZoneGeometry + ?Sized,
        R: Rng + ?Sized,
    {
        if count == 0 {
            return Ok(Vec::new());
        }
        let bounds = geometry.bounds().ok_or(UhiError::DegeneratePolygon {
            width: 0.,
            height: 0.,
        })?;
        if bounds.is_degenerate() {
            return Err(UhiError::DegeneratePolygon {
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        let (min, max) = (bounds.min(), bounds.max());
        let budget = self
            .max_attempts_per_point
            .map(|per_point| per_point.saturating_mul(count));
        let mut points = Vec::with_capacity(count);
        let mut attempts = 0usize;
        while points.len() < count {
            if budget.is_some_and(|budget| attempts >= budget) {
                return Err(UhiError::SamplingExhausted {
                    requested: count,
                    accepted: points.len(),
                    attempts,
                });
            }
            attempts += 1;
            let candidate = Coord {
                x: rng.gen_range(min.x..max.x),
                y: rng.gen_range(min.y..max.y),
            };
            if geometry.contains_coord(candidate) {
                points.push(candidate);
            }
        }
        Ok(points)
    }
}
