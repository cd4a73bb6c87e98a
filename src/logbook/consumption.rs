//! Surface-adjusted gas consumption from cylinder readings.

use serde::{Deserialize, Serialize};

/// Reference water temperature for the temperature correction, in Kelvin.
const STANDARD_TEMP_KELVIN: f64 = 293.15;

const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Cylinder readings taken around a dive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CylinderSample {
    /// Bar
    pub start_pressure: f64,
    /// Bar
    pub end_pressure: f64,
    /// Liters
    pub tank_volume: f64,
    /// Degrees Celsius
    pub water_temp: f64,
}

/// Average gas consumption at depth in liters per minute.
///
/// Treats half the maximum depth as the average depth. Returns `None` for a
/// zero-length dive.
pub fn air_consumption(sample: &CylinderSample, max_depth: f64, duration: u32) -> Option<f64> {
    if duration == 0 {
        return None;
    }

    let avg_depth = max_depth / 2.0;
    let pressure_at_depth = avg_depth / 10.0 + 1.0;

    let gas_used = (sample.start_pressure - sample.end_pressure) * sample.tank_volume;
    let temp_correction = (sample.water_temp + CELSIUS_TO_KELVIN) / STANDARD_TEMP_KELVIN;

    let actual_volume = gas_used * pressure_at_depth * temp_correction;
    Some(actual_volume / f64::from(duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CylinderSample {
        CylinderSample {
            start_pressure: 200.0,
            end_pressure: 50.0,
            tank_volume: 12.0,
            water_temp: 20.0,
        }
    }

    #[test]
    fn test_consumption_at_reference_temperature() {
        // 150 bar * 12 L = 1800 L, at 2 ata over 45 min
        let rate = air_consumption(&sample(), 20.0, 45).unwrap();
        assert!((rate - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_warmer_water_raises_consumption() {
        let cold = air_consumption(&sample(), 20.0, 45).unwrap();
        let warm = air_consumption(
            &CylinderSample {
                water_temp: 28.0,
                ..sample()
            },
            20.0,
            45,
        )
        .unwrap();
        assert!(warm > cold);
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(air_consumption(&sample(), 20.0, 0), None);
    }

    #[test]
    fn test_no_gas_used() {
        let full = CylinderSample {
            end_pressure: 200.0,
            ..sample()
        };
        assert_eq!(air_consumption(&full, 18.0, 30), Some(0.0));
    }
}
