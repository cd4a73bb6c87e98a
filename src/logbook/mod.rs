//! Dive log extras computed alongside a profile: the depth/time chart and
//! gas consumption.

pub mod chart;
pub mod consumption;

pub use chart::{build_chart, ChartPoint, DiveChart};
pub use consumption::{air_consumption, CylinderSample};
