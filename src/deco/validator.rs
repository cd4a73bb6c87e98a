//! Input validation for dive profile requests.
//!
//! The calculator trusts its inputs; everything arriving from outside goes
//! through here first.

use super::models::{DiveProfileInput, GasMixture, GasType};
use crate::logbook::CylinderSample;

/// Tolerance for percentage sums and fixed compositions.
const PERCENT_TOLERANCE: f64 = 0.1;

/// Recreational nitrox oxygen range in percent.
const NITROX_OXYGEN_RANGE: (f64, f64) = (21.0, 40.0);

/// Cylinder pressure ceiling in bar.
const MAX_CYLINDER_PRESSURE: f64 = 300.0;

/// Cylinder volume ceiling in liters.
const MAX_TANK_VOLUME: f64 = 20.0;

/// Adjustable validation bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    /// Deepest accepted planned depth in meters
    pub max_depth: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self { max_depth: 100.0 }
    }
}

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("depth must be greater than 0 and at most {limit} m (got {depth})")]
    DepthOutOfRange { depth: f64, limit: f64 },

    #[error("bottom time must be greater than 0 minutes")]
    ZeroBottomTime,

    #[error("{gas} percentage must be between 0 and 100 (got {value})")]
    PercentageOutOfRange { gas: &'static str, value: f64 },

    #[error("gas percentages must sum to 100% (got {total})")]
    PercentagesDoNotSum { total: f64 },

    #[error("air must be 21% O2, 79% N2")]
    InvalidAirMix,

    #[error("nitrox must contain between 21% and 40% oxygen (got {oxygen})")]
    NitroxOxygenOutOfRange { oxygen: f64 },

    #[error("nitrox oxygen and nitrogen must sum to 100% (got {total})")]
    NitroxNotBalanced { total: f64 },

    #[error("gas type {0} is not supported")]
    UnsupportedGasType(GasType),

    #[error("{field} must be between 0 and {max} (got {value})")]
    CylinderValueOutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("end pressure cannot be greater than start pressure")]
    EndPressureAboveStart,
}

/// Every rule a request failed, in check order.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "validation failed");
        Err(ValidationErrors(errors))
    }
}

/// Check a gas mixture's percentages and composition rules.
pub fn validate_gas(gas: &GasMixture) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, value) in [
        ("oxygen", gas.oxygen_pct),
        ("nitrogen", gas.nitrogen_pct),
        ("helium", gas.helium_pct),
    ] {
        if !(0.0..=100.0).contains(&value) {
            errors.push(ValidationError::PercentageOutOfRange { gas: name, value });
        }
    }

    let total = gas.oxygen_pct + gas.nitrogen_pct + gas.helium_pct;
    if (total - 100.0).abs() > PERCENT_TOLERANCE {
        errors.push(ValidationError::PercentagesDoNotSum { total });
    }

    match gas.gas_type {
        GasType::Air => {
            if (gas.oxygen_pct - 21.0).abs() > PERCENT_TOLERANCE
                || (gas.nitrogen_pct - 79.0).abs() > PERCENT_TOLERANCE
            {
                errors.push(ValidationError::InvalidAirMix);
            }
        }
        GasType::Nitrox => {
            let (min, max) = NITROX_OXYGEN_RANGE;
            if gas.oxygen_pct < min || gas.oxygen_pct > max {
                errors.push(ValidationError::NitroxOxygenOutOfRange {
                    oxygen: gas.oxygen_pct,
                });
            }
            let total = gas.oxygen_pct + gas.nitrogen_pct;
            if (total - 100.0).abs() > PERCENT_TOLERANCE {
                errors.push(ValidationError::NitroxNotBalanced { total });
            }
        }
        GasType::Other => errors.push(ValidationError::UnsupportedGasType(gas.gas_type)),
    }

    errors
}

/// Validate dive parameters before they reach the calculator.
pub fn validate_input(
    input: &DiveProfileInput,
    limits: &ValidationLimits,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if !(input.max_depth > 0.0 && input.max_depth <= limits.max_depth) {
        errors.push(ValidationError::DepthOutOfRange {
            depth: input.max_depth,
            limit: limits.max_depth,
        });
    }
    if input.bottom_time == 0 {
        errors.push(ValidationError::ZeroBottomTime);
    }
    errors.extend(validate_gas(&input.gas_mixture));

    into_result(errors)
}

/// Validate cylinder readings used for air consumption.
pub fn validate_cylinder(sample: &CylinderSample) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (field, value, max) in [
        ("start pressure", sample.start_pressure, MAX_CYLINDER_PRESSURE),
        ("end pressure", sample.end_pressure, MAX_CYLINDER_PRESSURE),
        ("tank volume", sample.tank_volume, MAX_TANK_VOLUME),
    ] {
        if !(0.0..=max).contains(&value) {
            errors.push(ValidationError::CylinderValueOutOfRange { field, value, max });
        }
    }
    if sample.end_pressure > sample.start_pressure {
        errors.push(ValidationError::EndPressureAboveStart);
    }

    into_result(errors)
}
