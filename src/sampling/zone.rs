use geo::Coord;
use log::{debug, warn};
use rand::Rng;

use crate::{
    components::{
        zones::{ZoneGeometry, ZoneKind, Zones},
        DataType, RasterGrid,
    },
    config::{PolygonFailurePolicy, SamplingConfig},
    errors::{Result, UhiError},
    sampling::PointSampler,
};

/// Points and values sampled from one zone kind on one raster.
#[derive(Debug, Clone)]
pub struct ZoneSampleResult {
    pub kind: ZoneKind,
    /// Every generated point, valid or not, in polygon order.
    pub points: Vec<Coord<f64>>,
    /// Calibrated values of points that did not hit no-data.
    pub values: Vec<f64>,
    pub out_of_bounds: usize,
    pub skipped_polygons: usize,
}

impl ZoneSampleResult {
    fn new(kind: ZoneKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            values: Vec::new(),
            out_of_bounds: 0,
            skipped_polygons: 0,
        }
    }

    /// Points that fell on no-data cells.
    pub fn missing(&self) -> usize {
        self.points.len() - self.values.len() - self.out_of_bounds
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ZoneSampler {
    point_sampler: PointSampler,
    points_per_polygon: usize,
    policy: PolygonFailurePolicy,
}

impl From<&SamplingConfig> for ZoneSampler {
    fn from(config: &SamplingConfig) -> Self {
        Self {
            point_sampler: PointSampler::new(config.max_attempts_per_point),
            points_per_polygon: config.points_per_polygon,
            policy: config.polygon_failure,
        }
    }
}

impl ZoneSampler {
    pub fn new(
        point_sampler: PointSampler,
        points_per_polygon: usize,
        policy: PolygonFailurePolicy,
    ) -> Self {
        Self {
            point_sampler,
            points_per_polygon,
            policy,
        }
    }

    pub fn sample_zone<T: DataType, R: Rng + ?Sized>(
        &self,
        zones: &Zones,
        grid: &RasterGrid<T>,
        rng: &mut R,
    ) -> Result<ZoneSampleResult> {
        let kind = zones.kind;
        let raster_bounds = grid.geo_bounds();
        let mut result = ZoneSampleResult::new(kind);
        for (index, shape) in zones.iter().enumerate() {
            let points = match self.point_sampler.sample(shape, self.points_per_polygon, rng) {
                Ok(points) => points,
                Err(err) if self.policy == PolygonFailurePolicy::Skip => {
                    warn!("skipping {kind} polygon {index}: {err}");
                    result.skipped_polygons += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };
            if shape
                .bounds()
                .is_some_and(|bounds| !bounds.overlaps(&raster_bounds))
            {
                warn!("{kind} polygon {index} lies outside of {}", grid.description());
            }
            for point in &points {
                match grid.read_value(*point) {
                    Ok(Some(value)) => result.values.push(value),
                    Ok(None) => (),
                    Err(UhiError::OutOfBounds { .. }) => result.out_of_bounds += 1,
                    Err(err) => return Err(err),
                }
            }
            debug!("generated {} {kind} points", points.len());
            result.points.extend(points);
        }
        if result.out_of_bounds > 0 {
            if result.out_of_bounds == result.points.len() {
                return Err(UhiError::ExtentMismatch {
                    zone: kind,
                    points: result.out_of_bounds,
                });
            }
            warn!(
                "{} of {} {kind} points outside of {}",
                result.out_of_bounds,
                result.points.len(),
                grid.description()
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buffer::Buffer,
        components::{BandGeoTransform, BandInfo},
    };
    use approx::assert_relative_eq;
    use geo::{LineString, Polygon, Rect};
    use rand::{rngs::StdRng, SeedableRng};

    /// 10 x 10 grid over [0, 10]², left half 300, right half -32768.
    fn half_empty_grid() -> RasterGrid<i16> {
        let cells = (0..100)
            .map(|idx| if idx % 10 < 5 { 300 } else { -32768 })
            .collect();
        RasterGrid::new(
            "half",
            Buffer::from_vec([10, 10], cells).unwrap(),
            BandGeoTransform::north_up((0., 10.), 1.),
            BandInfo::default(),
        )
        .unwrap()
    }

    fn square(min: (f64, f64), max: (f64, f64)) -> Polygon<f64> {
        Rect::new(min, max).to_polygon()
    }

    fn sampler(points: usize, policy: PolygonFailurePolicy) -> ZoneSampler {
        ZoneSampler::new(PointSampler::default(), points, policy)
    }

    #[test_log::test]
    fn keeps_every_point_but_only_valid_values() {
        let zones = Zones::new(
            ZoneKind::Urban,
            [square((1., 1.), (4., 9.)), square((6., 1.), (9., 9.))],
        );
        let mut rng = StdRng::seed_from_u64(0);
        let result = sampler(50, PolygonFailurePolicy::AbortImage)
            .sample_zone(&zones, &half_empty_grid(), &mut rng)
            .unwrap();
        assert_eq!(result.kind, ZoneKind::Urban);
        assert_eq!(result.points.len(), 100);
        assert_eq!(result.values.len(), 50);
        assert_eq!(result.missing(), 50);
        assert!(result.values.iter().all(|value| *value == 300.));
        // First polygon's points come first.
        assert!(result.points[..50].iter().all(|point| point.x < 5.));
    }

    #[test_log::test]
    fn overlapping_polygons_are_not_deduplicated() {
        let zones = Zones::new(
            ZoneKind::Rural,
            [square((1., 1.), (4., 4.)), square((1., 1.), (4., 4.))],
        );
        let mut rng = StdRng::seed_from_u64(1);
        let result = sampler(10, PolygonFailurePolicy::AbortImage)
            .sample_zone(&zones, &half_empty_grid(), &mut rng)
            .unwrap();
        assert_eq!(result.points.len(), 20);
        assert_relative_eq!(result.values.iter().sum::<f64>(), 6000.);
    }

    #[test_log::test]
    fn zone_outside_raster_is_an_extent_mismatch() {
        let zones = Zones::new(ZoneKind::Rural, [square((20., 20.), (30., 30.))]);
        let mut rng = StdRng::seed_from_u64(2);
        let result = sampler(10, PolygonFailurePolicy::AbortImage).sample_zone(
            &zones,
            &half_empty_grid(),
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(UhiError::ExtentMismatch {
                zone: ZoneKind::Rural,
                points: 10
            })
        ));
    }

    #[test_log::test]
    fn partially_outside_zone_counts_out_of_bounds() {
        let zones = Zones::new(
            ZoneKind::Urban,
            [square((1., 1.), (4., 4.)), square((20., 20.), (30., 30.))],
        );
        let mut rng = StdRng::seed_from_u64(3);
        let result = sampler(10, PolygonFailurePolicy::AbortImage)
            .sample_zone(&zones, &half_empty_grid(), &mut rng)
            .unwrap();
        assert_eq!(result.points.len(), 20);
        assert_eq!(result.out_of_bounds, 10);
        assert_eq!(result.values.len(), 10);
        assert_eq!(result.missing(), 0);
    }

    #[test_log::test]
    fn degenerate_polygon_follows_policy() {
        let line = Polygon::new(LineString::from(vec![(1., 1.), (3., 1.)]), vec![]);
        let zones = Zones::new(ZoneKind::Urban, [line, square((1., 1.), (4., 4.))]);
        let grid = half_empty_grid();

        let aborted = sampler(5, PolygonFailurePolicy::AbortImage).sample_zone(
            &zones,
            &grid,
            &mut StdRng::seed_from_u64(4),
        );
        assert!(matches!(aborted, Err(UhiError::DegeneratePolygon { .. })));

        let skipped = sampler(5, PolygonFailurePolicy::Skip)
            .sample_zone(&zones, &grid, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(skipped.skipped_polygons, 1);
        assert_eq!(skipped.points.len(), 5);
        assert_eq!(skipped.values.len(), 5);
    }

    #[test_log::test]
    fn empty_zone_set_yields_empty_result() {
        let zones = Zones::new(ZoneKind::Urban, Vec::<Polygon<f64>>::new());
        let result = sampler(5, PolygonFailurePolicy::AbortImage)
            .sample_zone(&zones, &half_empty_grid(), &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert!(result.points.is_empty());
        assert!(result.values.is_empty());
    }
}
