use serde::Serialize;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Zone means of one image and their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UhiSummary {
    pub urban_mean: Option<f64>,
    pub rural_mean: Option<f64>,
    /// Only present when both means are.
    pub uhi: Option<f64>,
}

impl UhiSummary {
    pub fn compute(urban_values: &[f64], rural_values: &[f64]) -> Self {
        let urban_mean = mean(urban_values);
        let rural_mean = mean(rural_values);
        let uhi = urban_mean.zip(rural_mean).map(|(urban, rural)| urban - rural);
        Self {
            urban_mean,
            rural_mean,
            uhi,
        }
    }
}
