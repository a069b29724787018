use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use urbanheat::{
    components::ZoneKind,
    discovery::find_rasters,
    export::write_sample_geojson,
    gdal_engine::{read_zones, GdalSource},
    BatchRunner, PolygonFailurePolicy, SamplingConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "urbanheat",
    about = "Urban heat island from land surface temperature rasters"
)]
struct Args {
    /// Directory searched recursively for .tif rasters
    #[arg(long)]
    root: PathBuf,

    /// Vector file with urban polygons
    #[arg(long)]
    urban: PathBuf,

    /// Vector file with rural polygons
    #[arg(long)]
    rural: PathBuf,

    /// Output CSV (default: <root>/results_summary.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with sampling settings, flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random points per polygon
    #[arg(long)]
    points: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Candidate draws allowed per requested point, 0 retries until enough points are found
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Skip polygons that cannot be sampled instead of failing the image
    #[arg(long)]
    skip_failed_polygons: bool,

    /// Process images one after the other
    #[arg(long)]
    sequential: bool,

    /// Write the points of the last image and the zones as GeoJSON
    #[arg(long)]
    export_sample: Option<PathBuf>,
}

impl Args {
    fn sampling_config(&self) -> Result<SamplingConfig> {
        let mut config = match &self.config {
            Some(path) => SamplingConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => SamplingConfig::default(),
        };
        if let Some(points) = self.points {
            config.points_per_polygon = points;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts_per_point = (max_attempts > 0).then_some(max_attempts);
        }
        if self.skip_failed_polygons {
            config.polygon_failure = PolygonFailurePolicy::Skip;
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = args.sampling_config()?;
    info!("{config:?}");

    let urban = read_zones(&args.urban, ZoneKind::Urban)
        .with_context(|| format!("reading urban zones {}", args.urban.display()))?;
    let rural = read_zones(&args.rural, ZoneKind::Rural)
        .with_context(|| format!("reading rural zones {}", args.rural.display()))?;

    let rasters = find_rasters(&args.root)
        .with_context(|| format!("searching rasters in {}", args.root.display()))?;
    if rasters.is_empty() {
        bail!("no .tif rasters under {}", args.root.display());
    }
    info!("found {} rasters", rasters.len());
    let sources: Vec<GdalSource<f64>> = rasters
        .into_iter()
        .map(|path| GdalSource::new(path, config.no_data))
        .collect();

    let outcome = BatchRunner::<f64>::new(config).run(&sources, &urban, &rural);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.root.join("results_summary.csv"));
    outcome
        .report
        .to_csv_path(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("report written to {}", output.display());

    println!("Urban mean temperature statistics:");
    println!("{}", outcome.report.urban_means());
    println!("Rural mean temperature statistics:");
    println!("{}", outcome.report.rural_means());
    println!("Results:");
    println!("{}", outcome.report);

    if let Some(path) = &args.export_sample {
        match &outcome.last_sample {
            Some(sample) => {
                write_sample_geojson(path, sample, &urban, &rural)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("points of {} written to {}", sample.image, path.display());
            }
            None => warn!("no image was sampled, nothing to export"),
        }
    }
    Ok(())
}
