//! Gas physiology: partial pressures, narcotic depth and gas-adjusted NDL.

use super::models::{GasMixture, GasType, GasWarning, NoDecoLimit};
use super::tables::{ndl_for_depth, AIR_NITROGEN_FRACTION, MAX_END, MAX_PPN2, MAX_PPO2};

/// Partial pressure (bar) of a gas making up `gas_pct` percent of the mix at `depth`.
pub fn partial_pressure(gas_pct: f64, depth: f64) -> f64 {
    let absolute_pressure = depth / 10.0 + 1.0;
    (gas_pct / 100.0) * absolute_pressure
}

/// Equivalent narcotic depth in meters. Helium is not narcotic.
pub fn equivalent_narcotic_depth(depth: f64, gas: &GasMixture) -> f64 {
    depth * (gas.nitrogen_pct / 100.0) / AIR_NITROGEN_FRACTION
}

/// Equivalent air depth in meters for the nitrogen content of `gas`.
pub fn equivalent_air_depth(depth: f64, gas: &GasMixture) -> f64 {
    ((depth + 10.0) * (gas.nitrogen_pct / 100.0) / AIR_NITROGEN_FRACTION) - 10.0
}

/// NDL for `depth` on `gas`. Anything but air is looked up at its EAD.
pub fn ndl_for_gas(depth: f64, gas: &GasMixture) -> NoDecoLimit {
    match gas.gas_type {
        GasType::Air => ndl_for_depth(depth),
        GasType::Nitrox | GasType::Other => ndl_for_depth(equivalent_air_depth(depth, gas)),
    }
}

/// Advisory warnings for breathing `gas` at `depth`, in ppO2, ppN2, END order.
pub fn gas_warnings(depth: f64, gas: &GasMixture) -> Vec<GasWarning> {
    let mut warnings = Vec::new();

    let ppo2 = partial_pressure(gas.oxygen_pct, depth);
    if ppo2 > MAX_PPO2 {
        warnings.push(GasWarning::Ppo2 { ppo2 });
    }

    let ppn2 = partial_pressure(gas.nitrogen_pct, depth);
    if ppn2 > MAX_PPN2 {
        warnings.push(GasWarning::Ppn2 { ppn2 });
    }

    let end = equivalent_narcotic_depth(depth, gas);
    if end > MAX_END {
        warnings.push(GasWarning::End { end });
    }

    if !warnings.is_empty() {
        tracing::debug!(depth, count = warnings.len(), "gas limits exceeded");
    }

    warnings
}
