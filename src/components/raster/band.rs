use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::components::DataType;

/// Raw value flagging a missing measurement when
/// the raster declares no sentinel of its own.
pub const DEFAULT_NO_DATA: f64 = -32768.;

/// Calibration of the single band of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandInfo {
    pub scale: f64,
    pub offset: f64,
    /// Sentinel compared against raw cell values.
    pub no_data: f64,
}

impl Default for BandInfo {
    fn default() -> Self {
        Self {
            scale: 1.,
            offset: 0.,
            no_data: DEFAULT_NO_DATA,
        }
    }
}

impl BandInfo {
    pub fn new(scale: Option<f64>, offset: Option<f64>, no_data: Option<f64>) -> Self {
        Self {
            scale: scale.unwrap_or(1.),
            offset: offset.unwrap_or(0.),
            no_data: no_data.unwrap_or(DEFAULT_NO_DATA),
        }
    }

    pub fn with_no_data(mut self, no_data: f64) -> Self {
        self.no_data = no_data;
        self
    }

    /// Physical value of a raw cell.
    ///
    /// The sentinel test runs on the raw value, before scale and offset.
    pub fn calibrate<T: DataType>(&self, raw: T) -> Option<f64> {
        let raw: f64 = raw.as_();
        if raw.is_nan() || raw == self.no_data {
            return None;
        }
        Some(raw * self.scale + self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1., 0.)]
    #[case(2., 5.)]
    #[case(0.02, -273.15)]
    fn sentinel_is_missing_for_any_calibration(#[case] scale: f64, #[case] offset: f64) {
        let band = BandInfo::new(Some(scale), Some(offset), None);
        assert_eq!(band.calibrate(-32768i16), None);
    }

    #[test]
    fn applies_scale_then_offset() {
        let band = BandInfo::new(Some(0.1), Some(0.), None);
        assert_relative_eq!(band.calibrate(300i16).unwrap(), 30., epsilon = 1e-12);
        let band = BandInfo::new(Some(0.02), Some(-273.15), None);
        assert_relative_eq!(band.calibrate(15_000u16).unwrap(), 26.85, epsilon = 1e-9);
    }

    #[test]
    fn scaled_value_equal_to_sentinel_is_kept() {
        // -16384 * 2 == -32768 but the raw value is not the sentinel.
        let band = BandInfo::new(Some(2.), None, None);
        assert_eq!(band.calibrate(-16384i16), Some(-32768.));
    }

    #[test]
    fn declared_sentinel_replaces_default() {
        let band = BandInfo::default().with_no_data(0.);
        assert_eq!(band.calibrate(0u16), None);
        assert_eq!(band.calibrate(-32768i32), Some(-32768.));
    }

    #[test]
    fn nan_cells_are_missing() {
        assert_eq!(BandInfo::default().calibrate(f32::NAN), None);
    }
}
