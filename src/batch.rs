use log::{error, info};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use std::marker::PhantomData;

use crate::{
    components::{file::ImageSource, zones::Zones, DataType},
    config::SamplingConfig,
    errors::{Result, UhiError},
    report::{ImageResult, Report},
    sampling::{ZoneSampleResult, ZoneSampler},
};

/// Every point generated for one image.
#[derive(Debug, Clone)]
pub struct ImageSample {
    pub image: String,
    pub urban: ZoneSampleResult,
    pub rural: ZoneSampleResult,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub report: Report,
    /// Sample of the last image, in input order, that got sampled.
    pub last_sample: Option<ImageSample>,
}

pub struct BatchRunner<T: DataType> {
    config: SamplingConfig,
    sampler: ZoneSampler,
    _t: PhantomData<T>,
}

impl<T: DataType> BatchRunner<T> {
    pub fn new(config: SamplingConfig) -> Self {
        let sampler = ZoneSampler::from(&config);
        Self {
            config,
            sampler,
            _t: PhantomData,
        }
    }

    /// Independent generator for the image at `index`.
    fn rng(&self, index: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        }
    }

    fn sample_image<S: ImageSource<T>>(
        &self,
        index: usize,
        image: String,
        source: &S,
        urban: &Zones,
        rural: &Zones,
    ) -> Result<ImageSample> {
        let grid = source.load().map_err(|err| UhiError::ImageLoadFailure {
            image: image.clone(),
            source: Box::new(err),
        })?;
        let mut rng = self.rng(index);
        let urban = self.sampler.sample_zone(urban, &grid, &mut rng)?;
        let rural = self.sampler.sample_zone(rural, &grid, &mut rng)?;
        Ok(ImageSample {
            image,
            urban,
            rural,
        })
    }

    fn process<S: ImageSource<T>>(
        &self,
        index: usize,
        source: &S,
        urban: &Zones,
        rural: &Zones,
    ) -> (ImageResult, Option<ImageSample>) {
        let image = source.identifier();
        info!("processing {image}");
        match self.sample_image(index, image.clone(), source, urban, rural) {
            Ok(sample) => {
                let result =
                    ImageResult::new(image, &sample.urban.values, &sample.rural.values);
                info!(
                    "{}: urban {} of {} points, rural {} of {} points, UHI {:?}",
                    result.image,
                    result.urban_count,
                    sample.urban.points.len(),
                    result.rural_count,
                    sample.rural.points.len(),
                    result.summary.uhi
                );
                (result, Some(sample))
            }
            Err(err) => {
                if err.is_systemic() {
                    error!("{image}: {err}, zones and raster do not line up");
                } else {
                    error!("{image}: {err}");
                }
                (ImageResult::failed(image, err), None)
            }
        }
    }

    /// One result per source, in the order of `sources`.
    pub fn run<S: ImageSource<T>>(
        &self,
        sources: &[S],
        urban: &Zones,
        rural: &Zones,
    ) -> BatchOutcome {
        let processed: Vec<(ImageResult, Option<ImageSample>)> = if self.config.parallel {
            sources
                .par_iter()
                .enumerate()
                .map(|(index, source)| self.process(index, source, urban, rural))
                .collect()
        } else {
            sources
                .iter()
                .enumerate()
                .map(|(index, source)| self.process(index, source, urban, rural))
                .collect()
        };
        let mut last_sample = None;
        let mut results = Vec::with_capacity(processed.len());
        for (result, sample) in processed {
            results.push(result);
            if sample.is_some() {
                last_sample = sample;
            }
        }
        let report = Report::from(results);
        info!(
            "processed {} images, {} failed",
            report.len(),
            report.failures().count()
        );
        BatchOutcome {
            report,
            last_sample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{BandGeoTransform, BandInfo, RasterGrid, ZoneKind},
        config::PolygonFailurePolicy,
    };
    use approx::assert_relative_eq;
    use geo::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In memory image with a constant value, or a load error.
    #[derive(Debug)]
    struct Constant {
        name: &'static str,
        value: Option<i16>,
        origin: (f64, f64),
        identified: AtomicUsize,
    }

    impl Constant {
        fn new(name: &'static str, value: Option<i16>) -> Self {
            Self {
                name,
                value,
                origin: (0., 100.),
                identified: AtomicUsize::new(0),
            }
        }
    }

    impl ImageSource<i16> for Constant {
        fn identifier(&self) -> String {
            self.identified.fetch_add(1, Ordering::Relaxed);
            self.name.to_string()
        }
        fn load(&self) -> Result<RasterGrid<i16>> {
            let value = self.value.ok_or_else(|| {
                UhiError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} is not readable", self.name),
                ))
            })?;
            RasterGrid::constant(
                (100, 100),
                value,
                BandGeoTransform::north_up(self.origin, 1.),
                BandInfo::default(),
            )
        }
    }

    fn zones(kind: ZoneKind, min: (f64, f64), max: (f64, f64)) -> Zones {
        Zones::new(kind, [Rect::new(min, max).to_polygon()])
    }

    fn runner(parallel: bool) -> BatchRunner<i16> {
        BatchRunner::new(SamplingConfig {
            points_per_polygon: 100,
            seed: Some(11),
            parallel,
            ..Default::default()
        })
    }

    #[test_log::test]
    fn failed_load_keeps_position() {
        let sources = [
            Constant::new("one", Some(300)),
            Constant::new("two", None),
            Constant::new("three", Some(290)),
        ];
        let urban = zones(ZoneKind::Urban, (10., 10.), (20., 20.));
        let rural = zones(ZoneKind::Rural, (50., 50.), (60., 60.));
        let outcome = runner(true).run(&sources, &urban, &rural);

        let images: Vec<&str> = outcome.report.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(images, ["one", "two", "three"]);
        let results: Vec<&ImageResult> = outcome.report.iter().collect();
        assert_relative_eq!(results[0].summary.urban_mean.unwrap(), 300.);
        assert_relative_eq!(results[0].summary.uhi.unwrap(), 0.);
        assert!(results[1].is_failed());
        assert_eq!(results[1].summary.urban_mean, None);
        assert_eq!(results[1].summary.rural_mean, None);
        assert_eq!(results[1].summary.uhi, None);
        assert!(results[1].failure.as_ref().unwrap().contains("two"));
        assert_relative_eq!(results[2].summary.rural_mean.unwrap(), 290.);
        assert_eq!(outcome.last_sample.unwrap().image, "three");
    }

    #[test_log::test]
    fn parallel_and_sequential_agree() {
        let sources: Vec<Constant> = (0..6)
            .map(|idx| Constant::new("img", Some(280 + idx)))
            .collect();
        let urban = zones(ZoneKind::Urban, (10., 10.), (20., 20.));
        let rural = zones(ZoneKind::Rural, (50., 50.), (60., 60.));
        let parallel = runner(true).run(&sources, &urban, &rural);
        let sequential = runner(false).run(&sources, &urban, &rural);
        assert_eq!(parallel.report, sequential.report);
        assert_eq!(
            parallel.last_sample.unwrap().urban.points,
            sequential.last_sample.unwrap().urban.points
        );
    }

    #[test_log::test]
    fn misaligned_image_is_reported_as_failed() {
        let mut shifted = Constant::new("shifted", Some(300));
        shifted.origin = (10_000., 10_100.);
        let sources = [Constant::new("aligned", Some(300)), shifted];
        let urban = zones(ZoneKind::Urban, (10., 10.), (20., 20.));
        let rural = zones(ZoneKind::Rural, (50., 50.), (60., 60.));
        let outcome = runner(false).run(&sources, &urban, &rural);
        let results: Vec<&ImageResult> = outcome.report.iter().collect();
        assert!(!results[0].is_failed());
        assert!(results[1].failure.as_ref().unwrap().contains("outside of raster extent"));
        assert_eq!(outcome.last_sample.unwrap().image, "aligned");
    }

    #[test_log::test]
    fn degenerate_polygon_aborts_or_skips() {
        let sources = [Constant::new("one", Some(300))];
        let urban = Zones::new(
            ZoneKind::Urban,
            [
                Rect::new((10., 10.), (10., 20.)).to_polygon(),
                Rect::new((10., 10.), (20., 20.)).to_polygon(),
            ],
        );
        let rural = zones(ZoneKind::Rural, (50., 50.), (60., 60.));

        let aborted = runner(false).run(&sources, &urban, &rural);
        assert!(aborted.report.iter().all(ImageResult::is_failed));
        assert!(aborted.last_sample.is_none());

        let skipping = BatchRunner::<i16>::new(SamplingConfig {
            points_per_polygon: 10,
            polygon_failure: PolygonFailurePolicy::Skip,
            ..Default::default()
        });
        let skipped = skipping.run(&sources, &urban, &rural);
        let result = skipped.report.iter().next().unwrap();
        assert!(!result.is_failed());
        assert_eq!(result.urban_count, 10);
        assert_eq!(skipped.last_sample.unwrap().urban.skipped_polygons, 1);
    }

    #[test_log::test]
    fn image_is_identified_once() {
        let sources = [Constant::new("one", Some(300)), Constant::new("two", None)];
        let urban = zones(ZoneKind::Urban, (10., 10.), (20., 20.));
        let rural = zones(ZoneKind::Rural, (50., 50.), (60., 60.));
        runner(true).run(&sources, &urban, &rural);
        for source in &sources {
            assert_eq!(source.identified.load(Ordering::Relaxed), 1);
        }
    }

    #[test]
    fn no_sources_no_results() {
        let urban = zones(ZoneKind::Urban, (10., 10.), (20., 20.));
        let rural = zones(ZoneKind::Rural, (50., 50.), (60., 60.));
        let outcome = runner(true).run(&Vec::<Constant>::new(), &urban, &rural);
        assert!(outcome.report.is_empty());
        assert!(outcome.last_sample.is_none());
    }
}
