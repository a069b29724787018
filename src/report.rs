use itertools::Itertools;
use serde::Serialize;
use std::{fmt::Display, io::Write, path::Path};

use crate::{errors::Result, uhi::UhiSummary};

/// Outcome of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub image: String,
    pub summary: UhiSummary,
    pub urban_count: usize,
    pub rural_count: usize,
    /// Why the image could not be processed.
    pub failure: Option<String>,
}

impl ImageResult {
    pub fn new(image: String, urban_values: &[f64], rural_values: &[f64]) -> Self {
        Self {
            image,
            summary: UhiSummary::compute(urban_values, rural_values),
            urban_count: urban_values.len(),
            rural_count: rural_values.len(),
            failure: None,
        }
    }

    pub fn failed(image: String, failure: impl Display) -> Self {
        Self {
            image,
            summary: UhiSummary::default(),
            urban_count: 0,
            rural_count: 0,
            failure: Some(failure.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    image: &'a str,
    urban_mean: Option<f64>,
    rural_mean: Option<f64>,
    #[serde(rename = "UHI")]
    uhi: Option<f64>,
}

impl<'a> From<&'a ImageResult> for CsvRow<'a> {
    fn from(value: &'a ImageResult) -> Self {
        Self {
            image: &value.image,
            urban_mean: value.summary.urban_mean,
            rural_mean: value.summary.rural_mean,
            uhi: value.summary.uhi,
        }
    }
}

/// Image results in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report(Vec<ImageResult>);

impl From<Vec<ImageResult>> for Report {
    fn from(value: Vec<ImageResult>) -> Self {
        Self(value)
    }
}

impl Report {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageResult> {
        self.0.iter()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImageResult> {
        self.iter().filter(|result| result.is_failed())
    }

    pub fn urban_means(&self) -> Describe {
        Describe::new(self.iter().filter_map(|result| result.summary.urban_mean))
    }

    pub fn rural_means(&self) -> Describe {
        Describe::new(self.iter().filter_map(|result| result.summary.rural_mean))
    }

    /// Columns `image,urban_mean,rural_mean,UHI`, missing values left empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for result in self.iter() {
            writer.serialize(CsvRow::from(result))?;
        }
        if self.is_empty() {
            writer.write_record(["image", "urban_mean", "rural_mean", "UHI"])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(std::fs::File::create(path)?)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = |value: Option<f64>| value.map_or("NaN".to_string(), |value| format!("{value:.4}"));
        writeln!(f, "{:>4}  image  urban_mean  rural_mean  UHI", "")?;
        for (index, result) in self.iter().enumerate() {
            writeln!(
                f,
                "{index:>4}  {}  {}  {}  {}",
                result.image,
                cell(result.summary.urban_mean),
                cell(result.summary.rural_mean),
                cell(result.summary.uhi)
            )?;
        }
        Ok(())
    }
}

/// Descriptive statistics of a column, missing values excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation, needs two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let sorted: Vec<f64> = values
            .into_iter()
            .filter(|value| !value.is_nan())
            .sorted_by(f64::total_cmp)
            .collect();
        let count = sorted.len();
        let mean = crate::uhi::mean(&sorted);
        let std = mean.filter(|_| count > 1).map(|mean| {
            let sum_sq: f64 = sorted.iter().map(|value| (value - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        });
        Self {
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Linear interpolation between closest ranks of sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

impl Display for Describe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = [
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ];
        writeln!(f, "count {:>12}", self.count)?;
        for (name, value) in rows {
            match value {
                Some(value) => writeln!(f, "{name:<5} {value:>12.6}")?,
                None => writeln!(f, "{name:<5} {:>12}", "NaN")?,
            }
        }
        Ok(())
    }
}
