//! Dive Planner
//!
//! Recreational dive profile planning: no-decompression limits, safety and
//! decompression stops, gas warnings and repetitive-dive pressure groups.

pub mod config;
pub mod deco;
pub mod error;
pub mod logbook;
pub mod report;

pub use deco::{calculate, calculate_dive_profile};
pub use error::{AppError, Result};
