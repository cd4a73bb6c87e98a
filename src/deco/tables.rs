//! Fixed decompression tables and constants.

use super::models::NoDecoLimit;

/// No-decompression limits for air as (max depth in meters, minutes).
///
/// Sorted by depth; a dive uses the first row whose depth is at or below
/// the row depth.
pub const NDL_TABLE: [(f64, u32); 12] = [
    (10.0, 219),
    (12.0, 147),
    (14.0, 98),
    (16.0, 72),
    (18.0, 56),
    (20.0, 45),
    (22.0, 37),
    (25.0, 29),
    (30.0, 20),
    (35.0, 14),
    (40.0, 9),
    (42.0, 8),
];

/// Ascent rate in meters per minute.
pub const ASCENT_RATE: f64 = 10.0;

/// Advisory descent rate cap in meters per minute.
pub const MAX_DESCENT_RATE: f64 = 30.0;

/// Oxygen toxicity limit in bar.
pub const MAX_PPO2: f64 = 1.4;

/// Nitrogen narcosis limit in bar.
pub const MAX_PPN2: f64 = 3.96;

/// Equivalent narcotic depth limit in meters.
pub const MAX_END: f64 = 30.0;

/// Nitrogen fraction of air.
pub const AIR_NITROGEN_FRACTION: f64 = 0.79;

/// Table lookups round depths up to this increment (meters).
pub const DEPTH_INCREMENT: f64 = 3.0;

/// Candidate decompression stop depths for deep dives, deepest first.
pub const DEEP_STOP_DEPTHS: [f64; 5] = [18.0, 15.0, 12.0, 9.0, 6.0];

/// Safety stop depth (meters) and duration (minutes).
pub const SAFETY_STOP_DEPTH: f64 = 5.0;
pub const SAFETY_STOP_MINUTES: u32 = 3;

/// Round `value` up to the next multiple of `increment`.
pub fn ceil_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment).ceil() * increment
}

/// Look up the air NDL for `depth` without any rounding.
pub fn ndl_for_depth(depth: f64) -> NoDecoLimit {
    NDL_TABLE
        .iter()
        .find(|(table_depth, _)| depth <= *table_depth)
        .map(|&(_, minutes)| NoDecoLimit::Minutes(minutes))
        .unwrap_or(NoDecoLimit::Exceeded)
}
