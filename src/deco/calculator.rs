//! Dive profile calculation: stop schedule, NDL, pressure group and gas info.
//!
//! Uses a fixed air NDL table with heuristic stop rules rather than a tissue
//! model. Every function here is pure; depths are meters, times are minutes.

use super::gas::{equivalent_narcotic_depth, gas_warnings, ndl_for_gas, partial_pressure};
use super::models::{
    DecompressionStop, DiveProfileInput, DiveProfileRequest, DiveProfileResult, GasInfo,
    NoDecoLimit, PressureGroup,
};
use super::tables::{
    ceil_to_increment, ndl_for_depth, ASCENT_RATE, DEEP_STOP_DEPTHS, DEPTH_INCREMENT,
    MAX_DESCENT_RATE, SAFETY_STOP_DEPTH, SAFETY_STOP_MINUTES,
};

/// Total stop time above which a dive counts as a decompression dive.
const DECO_DIVE_THRESHOLD: u32 = 3;

/// Depth rounded up to the table increment.
pub fn working_depth(max_depth: f64) -> f64 {
    ceil_to_increment(max_depth, DEPTH_INCREMENT)
}

/// Whether a 3 minute safety stop at 5 m is called for.
pub fn requires_safety_stop(max_depth: f64, bottom_time: u32) -> bool {
    let rounded_depth = working_depth(max_depth);
    let direct_ascent_time = max_depth / ASCENT_RATE;

    max_depth > 20.0
        || bottom_time > 40
        || rounded_depth * f64::from(bottom_time) > 400.0
        || direct_ascent_time > 4.0
}

fn scaled_minutes(minutes: f64, floor: u32) -> u32 {
    (minutes.ceil() as u32).max(floor)
}

/// Decompression stops for `excess_time` minutes past the NDL, deepest first.
///
/// Dives with a working depth of 20 m or less get no stops.
pub fn decompression_stops(rounded_depth: f64, excess_time: u32) -> Vec<DecompressionStop> {
    let excess = f64::from(excess_time);
    let mut stops = Vec::new();

    if rounded_depth > 30.0 {
        let deep_stop = ceil_to_increment(rounded_depth / 2.0, DEPTH_INCREMENT);
        stops.push(DecompressionStop::new(deep_stop, 2));

        for &stop_depth in DEEP_STOP_DEPTHS
            .iter()
            .filter(|&&d| d < rounded_depth - 9.0)
        {
            let duration = scaled_minutes(excess * stop_depth / rounded_depth, 3);
            stops.push(DecompressionStop::new(stop_depth, duration));
        }

        stops.push(DecompressionStop::new(5.0, scaled_minutes(excess * 0.3, 5)));
    } else if rounded_depth > 20.0 {
        if rounded_depth > 25.0 {
            stops.push(DecompressionStop::new(9.0, scaled_minutes(excess * 0.3, 3)));
        }
        stops.push(DecompressionStop::new(6.0, scaled_minutes(excess * 0.3, 3)));
        stops.push(DecompressionStop::new(5.0, scaled_minutes(excess * 0.4, 3)));
    }

    stops
}

/// Pressure group after the dive.
///
/// Always reads the air table, whatever gas was breathed.
pub fn pressure_group(max_depth: f64, bottom_time: u32) -> PressureGroup {
    match ndl_for_depth(working_depth(max_depth)) {
        NoDecoLimit::Exceeded | NoDecoLimit::Minutes(0) => PressureGroup::M,
        NoDecoLimit::Minutes(ndl) => {
            let fraction = (f64::from(bottom_time) / f64::from(ndl)).min(1.0);
            let last = PressureGroup::ALL.len() - 1;
            PressureGroup::from_index((fraction * last as f64).floor() as usize)
        }
    }
}

/// Safety stop (if any) followed by the decompression schedule.
///
/// The safety stop comes first even when deeper deco stops follow it.
pub fn calculate_stops(input: &DiveProfileInput) -> (Vec<DecompressionStop>, bool) {
    let rounded_depth = working_depth(input.max_depth);
    let ndl = ndl_for_gas(rounded_depth, &input.gas_mixture);

    let mut stops = Vec::new();
    let safety_stop = requires_safety_stop(input.max_depth, input.bottom_time);
    if safety_stop {
        stops.push(DecompressionStop::new(SAFETY_STOP_DEPTH, SAFETY_STOP_MINUTES));
    }

    if input.bottom_time > ndl.minutes() {
        let excess_time = input.bottom_time - ndl.minutes();
        tracing::debug!(rounded_depth, excess_time, "bottom time exceeds NDL");
        stops.extend(decompression_stops(rounded_depth, excess_time));
    }

    (stops, safety_stop)
}

/// Compute the complete profile for a dive.
///
/// Inputs are expected to have passed [`super::validator::validate_input`].
pub fn calculate(input: &DiveProfileInput) -> DiveProfileResult {
    let gas = &input.gas_mixture;
    let rounded_depth = working_depth(input.max_depth);

    let (stops, requires_safety_stop) = calculate_stops(input);
    let total_deco_time: u32 = stops.iter().map(|s| s.duration).sum();
    let direct_ascent_time = (input.max_depth / ASCENT_RATE).ceil() as u32;

    let ppo2 = partial_pressure(gas.oxygen_pct, input.max_depth);
    let end = equivalent_narcotic_depth(input.max_depth, gas);

    let result = DiveProfileResult {
        requires_safety_stop,
        total_deco_time,
        pressure_group: pressure_group(input.max_depth, input.bottom_time),
        // Looked up at the working depth: 19 m on air reads the 22 m row.
        no_deco_limit: ndl_for_gas(rounded_depth, gas),
        is_deco_dive: total_deco_time > DECO_DIVE_THRESHOLD,
        total_ascent_time: direct_ascent_time + total_deco_time,
        ascent_rate: ASCENT_RATE,
        max_descent_rate: MAX_DESCENT_RATE,
        gas_info: GasInfo {
            ppo2_at_depth: round_to(ppo2, 2),
            end: round_to(end, 1),
            warnings: gas_warnings(input.max_depth, gas),
        },
        stops,
    };

    tracing::debug!(
        max_depth = input.max_depth,
        bottom_time = input.bottom_time,
        stops = result.stops.len(),
        total_deco_time,
        pressure_group = %result.pressure_group,
        "dive profile calculated"
    );

    result
}

/// Compute a profile from the flat, defaulted request form.
pub fn calculate_dive_profile(request: &DiveProfileRequest) -> DiveProfileResult {
    calculate(&request.to_input())
}

/// Round to `places` decimals the way the decimal formatter does, so 0.735
/// (stored just below the tie) reads 0.73 rather than 0.74.
fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}
