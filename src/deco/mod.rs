//! Dive profile calculation module.
//!
//! Computes safety and decompression stops, no-decompression limits, gas
//! warnings and post-dive pressure groups from a simplified air NDL table.

pub mod calculator;
pub mod gas;
pub mod models;
pub mod tables;
pub mod validator;

pub use calculator::{calculate, calculate_dive_profile};
pub use models::{
    DecompressionStop, DiveProfileInput, DiveProfileRequest, DiveProfileResult, GasInfo,
    GasMixture, GasType, GasWarning, NoDecoLimit, PressureGroup,
};
pub use validator::{validate_input, ValidationError, ValidationErrors, ValidationLimits};
