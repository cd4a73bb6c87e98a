//! Data types for dive profile calculation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::tables::{MAX_END, MAX_PPN2, MAX_PPO2};

/// Breathing gas family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum GasType {
    Air,
    Nitrox,
    /// Any other tag; computed as non-air but rejected by the validator
    #[serde(other)]
    Other,
}

impl FromStr for GasType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "air" => Ok(Self::Air),
            "nitrox" | "ean" => Ok(Self::Nitrox),
            other => Err(format!("unknown gas type '{}'", other)),
        }
    }
}

impl fmt::Display for GasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Air => write!(f, "Air"),
            Self::Nitrox => write!(f, "Nitrox"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Gas mixture in percent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GasMixture {
    pub oxygen_pct: f64,
    pub nitrogen_pct: f64,
    #[serde(default)]
    pub helium_pct: f64,
    pub gas_type: GasType,
}

impl GasMixture {
    /// Plain air, 21/79.
    pub fn air() -> Self {
        Self {
            oxygen_pct: 21.0,
            nitrogen_pct: 79.0,
            helium_pct: 0.0,
            gas_type: GasType::Air,
        }
    }

    /// Enriched air with the balance being nitrogen.
    pub fn nitrox(oxygen_pct: f64) -> Self {
        Self {
            oxygen_pct,
            nitrogen_pct: 100.0 - oxygen_pct,
            helium_pct: 0.0,
            gas_type: GasType::Nitrox,
        }
    }
}

impl Default for GasMixture {
    fn default() -> Self {
        Self::air()
    }
}

/// Repetitive-dive pressure group, A (least loaded) through M.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PressureGroup {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
}

impl PressureGroup {
    /// All groups in loading order.
    pub const ALL: [PressureGroup; 13] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
    ];

    /// Group at `index`, saturating at M.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl fmt::Display for PressureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for PressureGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
                Self::ALL
                    .get(index)
                    .copied()
                    .ok_or_else(|| format!("pressure group '{}' is outside A-M", c))
            }
            _ => Err(format!("invalid pressure group '{}'", s)),
        }
    }
}

impl Serialize for PressureGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PressureGroup {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parameters of a single planned dive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiveProfileInput {
    /// Maximum depth in meters
    pub max_depth: f64,
    /// Bottom time in minutes
    pub bottom_time: u32,
    pub gas_mixture: GasMixture,
    pub previous_dive_group: PressureGroup,
    /// Minutes since the previous dive
    pub surface_interval: u32,
}

impl DiveProfileInput {
    pub fn new(max_depth: f64, bottom_time: u32) -> Self {
        Self {
            max_depth,
            bottom_time,
            gas_mixture: GasMixture::air(),
            previous_dive_group: PressureGroup::A,
            surface_interval: default_surface_interval(),
        }
    }

    pub fn with_gas(mut self, gas_mixture: GasMixture) -> Self {
        self.gas_mixture = gas_mixture;
        self
    }

    pub fn with_previous_dive(mut self, group: PressureGroup, surface_interval: u32) -> Self {
        self.previous_dive_group = group;
        self.surface_interval = surface_interval;
        self
    }
}

/// Flat request payload for a dive profile, defaulting to air.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiveProfileRequest {
    pub max_depth: f64,
    pub bottom_time: u32,
    #[serde(default = "default_oxygen_pct")]
    pub oxygen_pct: f64,
    #[serde(default = "default_nitrogen_pct")]
    pub nitrogen_pct: f64,
    #[serde(default)]
    pub helium_pct: f64,
    #[serde(default = "default_gas_type")]
    pub gas_type: GasType,
    #[serde(default)]
    pub previous_group: PressureGroup,
    #[serde(default = "default_surface_interval")]
    pub surface_interval: u32,
}

fn default_oxygen_pct() -> f64 {
    21.0
}

fn default_nitrogen_pct() -> f64 {
    79.0
}

fn default_gas_type() -> GasType {
    GasType::Air
}

fn default_surface_interval() -> u32 {
    720
}

impl DiveProfileRequest {
    /// Air dive with default repetitive-dive inputs.
    pub fn new(max_depth: f64, bottom_time: u32) -> Self {
        Self {
            max_depth,
            bottom_time,
            oxygen_pct: default_oxygen_pct(),
            nitrogen_pct: default_nitrogen_pct(),
            helium_pct: 0.0,
            gas_type: default_gas_type(),
            previous_group: PressureGroup::A,
            surface_interval: default_surface_interval(),
        }
    }

    pub fn gas_mixture(&self) -> GasMixture {
        GasMixture {
            oxygen_pct: self.oxygen_pct,
            nitrogen_pct: self.nitrogen_pct,
            helium_pct: self.helium_pct,
            gas_type: self.gas_type,
        }
    }

    pub fn to_input(&self) -> DiveProfileInput {
        DiveProfileInput::new(self.max_depth, self.bottom_time)
            .with_gas(self.gas_mixture())
            .with_previous_dive(self.previous_group, self.surface_interval)
    }
}

/// A timed stop during ascent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DecompressionStop {
    /// Stop depth in meters
    pub depth: f64,
    /// Stop duration in minutes
    pub duration: u32,
}

impl DecompressionStop {
    pub const fn new(depth: f64, duration: u32) -> Self {
        Self { depth, duration }
    }
}

/// No-decompression limit for a dive.
///
/// Serialized as whole minutes; `Exceeded` is written as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDecoLimit {
    Minutes(u32),
    /// Deeper than the table covers; any bottom time needs decompression
    Exceeded,
}

impl NoDecoLimit {
    /// Limit in minutes, `0` when exceeded.
    pub fn minutes(self) -> u32 {
        match self {
            Self::Minutes(m) => m,
            Self::Exceeded => 0,
        }
    }

    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::Exceeded)
    }
}

impl Serialize for NoDecoLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.minutes())
    }
}

/// Advisory gas-physiology warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GasWarning {
    /// Oxygen partial pressure (bar) above the toxicity limit
    Ppo2 { ppo2: f64 },
    /// Nitrogen partial pressure (bar) above the narcosis limit
    Ppn2 { ppn2: f64 },
    /// Equivalent narcotic depth (m) above the limit
    End { end: f64 },
}

impl fmt::Display for GasWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ppo2 { ppo2 } => write!(
                f,
                "WARNING: PPO2 of {:.2} bar exceeds maximum {} bar",
                ppo2, MAX_PPO2
            ),
            Self::Ppn2 { ppn2 } => write!(
                f,
                "WARNING: PPN2 of {:.2} bar exceeds maximum {} bar",
                ppn2, MAX_PPN2
            ),
            Self::End { end } => write!(
                f,
                "WARNING: END of {:.1}m exceeds maximum {}m",
                end, MAX_END
            ),
        }
    }
}

impl Serialize for GasWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Gas figures at maximum depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasInfo {
    /// Oxygen partial pressure in bar, 2 decimals
    pub ppo2_at_depth: f64,
    /// Equivalent narcotic depth in meters, 1 decimal
    pub end: f64,
    pub warnings: Vec<GasWarning>,
}

/// Complete computed dive profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiveProfileResult {
    /// Safety stop first (if any), then decompression stops deepest first
    pub stops: Vec<DecompressionStop>,
    pub requires_safety_stop: bool,
    /// Sum of all stop durations in minutes
    pub total_deco_time: u32,
    pub pressure_group: PressureGroup,
    pub no_deco_limit: NoDecoLimit,
    pub is_deco_dive: bool,
    /// Direct ascent plus all stops, in minutes
    pub total_ascent_time: u32,
    /// Meters per minute
    pub ascent_rate: f64,
    /// Meters per minute
    pub max_descent_rate: f64,
    pub gas_info: GasInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_group_parse_and_display() {
        assert_eq!("a".parse::<PressureGroup>().unwrap(), PressureGroup::A);
        assert_eq!("M".parse::<PressureGroup>().unwrap(), PressureGroup::M);
        assert!("N".parse::<PressureGroup>().is_err());
        assert!("AB".parse::<PressureGroup>().is_err());
        assert!("".parse::<PressureGroup>().is_err());
        assert_eq!(PressureGroup::J.to_string(), "J");
    }

    #[test]
    fn test_pressure_group_index_saturates() {
        assert_eq!(PressureGroup::from_index(0), PressureGroup::A);
        assert_eq!(PressureGroup::from_index(12), PressureGroup::M);
        assert_eq!(PressureGroup::from_index(40), PressureGroup::M);
        assert_eq!(PressureGroup::from_index(7), PressureGroup::H);
    }

    #[test]
    fn test_request_defaults_to_air() {
        let request: DiveProfileRequest =
            serde_json::from_str(r#"{"max_depth": 18.0, "bottom_time": 40}"#).unwrap();

        assert_eq!(request, DiveProfileRequest::new(18.0, 40));
        assert_eq!(request.gas_mixture(), GasMixture::air());
        assert_eq!(request.surface_interval, 720);
        assert_eq!(request.previous_group, PressureGroup::A);
    }

    #[test]
    fn test_unknown_gas_type_deserializes_to_other() {
        let request: DiveProfileRequest = serde_json::from_str(
            r#"{"max_depth": 18.0, "bottom_time": 40, "gas_type": "Trimix"}"#,
        )
        .unwrap();
        assert_eq!(request.gas_type, GasType::Other);
    }

    #[test]
    fn test_no_deco_limit_serializes_as_minutes() {
        assert_eq!(serde_json::to_string(&NoDecoLimit::Minutes(56)).unwrap(), "56");
        assert_eq!(serde_json::to_string(&NoDecoLimit::Exceeded).unwrap(), "0");
    }

    #[test]
    fn test_no_deco_limit_exceeded() {
        assert!(NoDecoLimit::Exceeded.is_exceeded());
        assert_eq!(NoDecoLimit::Exceeded.minutes(), 0);
        assert!(!NoDecoLimit::Minutes(8).is_exceeded());
    }

    #[test]
    fn test_warning_text() {
        assert_eq!(
            GasWarning::Ppo2 { ppo2: 1.6 }.to_string(),
            "WARNING: PPO2 of 1.60 bar exceeds maximum 1.4 bar"
        );
        assert_eq!(
            GasWarning::Ppn2 { ppn2: 4.3457 }.to_string(),
            "WARNING: PPN2 of 4.35 bar exceeds maximum 3.96 bar"
        );
        assert_eq!(
            GasWarning::End { end: 45.0 }.to_string(),
            "WARNING: END of 45.0m exceeds maximum 30m"
        );
    }
}
