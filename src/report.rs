//! Validated plan requests and the report envelope returned for them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::deco::validator::{validate_cylinder, validate_input};
use crate::deco::{
    calculate, DiveProfileRequest, DiveProfileResult, ValidationErrors, ValidationLimits,
};
use crate::logbook::{air_consumption, build_chart, CylinderSample, DiveChart};

pub const TOOL: &str = "dive-planner";
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MODEL: &str = "Air NDL table";

/// A dive to plan plus optional log extras.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlanRequest {
    #[serde(flatten)]
    pub dive: DiveProfileRequest,
    /// Cylinder readings for a consumption figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinder: Option<CylinderSample>,
    #[serde(default)]
    pub include_chart: bool,
}

impl From<DiveProfileRequest> for PlanRequest {
    fn from(dive: DiveProfileRequest) -> Self {
        Self {
            dive,
            cylinder: None,
            include_chart: false,
        }
    }
}

/// Response envelope for a planned dive.
#[derive(Debug, Serialize)]
pub struct DivePlanReport {
    pub tool: &'static str,
    pub tool_version: &'static str,
    pub model: &'static str,
    /// SHA256 hash of the request
    pub input_hash: String,
    pub profile: DiveProfileResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<DiveChart>,
    /// Liters per minute at depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_consumption: Option<f64>,
}

/// Compute SHA256 hash of input string.
fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Validate a request and compute its report.
pub fn plan(
    request: &PlanRequest,
    limits: &ValidationLimits,
) -> Result<DivePlanReport, ValidationErrors> {
    let input = request.dive.to_input();

    let mut errors = Vec::new();
    if let Err(e) = validate_input(&input, limits) {
        errors.extend(e.0);
    }
    if let Some(Err(e)) = request.cylinder.as_ref().map(validate_cylinder) {
        errors.extend(e.0);
    }
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let input_json = serde_json::to_string(request).unwrap_or_default();
    let profile = calculate(&input);

    let chart = request
        .include_chart
        .then(|| build_chart(input.max_depth, input.bottom_time, &profile.stops));
    if let Some(chart) = &chart {
        tracing::debug!(
            points = chart.points.len(),
            runtime_seconds = chart.runtime_seconds(),
            "dive chart built"
        );
    }
    let air_consumption = request
        .cylinder
        .as_ref()
        .and_then(|c| air_consumption(c, input.max_depth, input.bottom_time));

    Ok(DivePlanReport {
        tool: TOOL,
        tool_version: TOOL_VERSION,
        model: MODEL,
        input_hash: sha256_hex(&input_json),
        profile,
        chart,
        air_consumption,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deco::ValidationError;

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    #[test]
    fn test_plan_air_dive() {
        let request = PlanRequest::from(DiveProfileRequest::new(18.0, 45));
        let report = plan(&request, &limits()).unwrap();

        assert_eq!(report.tool, "dive-planner");
        assert_eq!(report.profile.total_deco_time, 3);
        assert!(report.chart.is_none());
        assert!(report.air_consumption.is_none());
    }

    #[test]
    fn test_input_hash() {
        let request = PlanRequest::from(DiveProfileRequest::new(18.0, 45));
        let report = plan(&request, &limits()).unwrap();

        assert!(report.input_hash.starts_with("sha256:"));
        assert_eq!(report.input_hash.len(), 7 + 64); // "sha256:" + 64 hex chars

        let again = plan(&request, &limits()).unwrap();
        assert_eq!(report.input_hash, again.input_hash);

        let other = PlanRequest::from(DiveProfileRequest::new(18.0, 46));
        assert_ne!(plan(&other, &limits()).unwrap().input_hash, report.input_hash);
    }

    #[test]
    fn test_plan_with_extras() {
        let request = PlanRequest {
            dive: DiveProfileRequest::new(20.0, 45),
            cylinder: Some(CylinderSample {
                start_pressure: 200.0,
                end_pressure: 50.0,
                tank_volume: 12.0,
                water_temp: 20.0,
            }),
            include_chart: true,
        };
        let report = plan(&request, &limits()).unwrap();

        let chart = report.chart.unwrap();
        // 20 m works at 21 m: safety stop, then 6 m for 3 min and 5 m for 4 min
        assert_eq!(
            chart.runtime_seconds(),
            60 + 2700 + 90 + 180 + 6 + 180 + 6 + 240 + 30
        );
        assert_eq!(chart.points.first().map(|p| p.depth), Some(0.0));
        assert_eq!(chart.points.last().map(|p| p.depth), Some(0.0));
        assert!((report.air_consumption.unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_rejects_invalid_dive_and_cylinder_together() {
        let mut dive = DiveProfileRequest::new(18.0, 0);
        dive.oxygen_pct = 32.0;
        let request = PlanRequest {
            dive,
            cylinder: Some(CylinderSample {
                start_pressure: 50.0,
                end_pressure: 200.0,
                tank_volume: 12.0,
                water_temp: 20.0,
            }),
            include_chart: false,
        };

        let errors = plan(&request, &limits()).unwrap_err();
        let errors = errors.errors();
        assert_eq!(errors[0], ValidationError::ZeroBottomTime);
        assert!(errors.contains(&ValidationError::InvalidAirMix));
        assert_eq!(errors.last(), Some(&ValidationError::EndPressureAboveStart));
    }

    #[test]
    fn test_request_json_flattens_dive_fields() {
        let request: PlanRequest = serde_json::from_str(
            r#"{"max_depth": 30, "bottom_time": 25, "gas_type": "Nitrox",
                "oxygen_pct": 32, "nitrogen_pct": 68, "include_chart": true}"#,
        )
        .unwrap();

        assert_eq!(request.dive.oxygen_pct, 32.0);
        assert!(request.include_chart);
        assert!(request.cylinder.is_none());
    }
}
