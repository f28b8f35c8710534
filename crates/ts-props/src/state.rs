//! Resolved thermodynamic state definitions.

use std::fmt;
use ts_core::units::{Density, Pressure, Temperature};
use uom::si::{
    mass_density::kilogram_per_cubic_meter, pressure::pascal,
    thermodynamic_temperature::kelvin,
};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific internal energy [J/kg].
pub type SpecInternalEnergy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// How the resolved state was obtained.
///
/// `BestEffort` marks states returned after a solver hit its iteration cap
/// without tight convergence: still within the loose secondary tolerance,
/// but not to be confused with a strictly converged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Converged,
    BestEffort,
}

/// Phase region of a resolved state. Exactly one variant holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    CompressedLiquid,
    SaturatedLiquid,
    SaturatedMixture { quality: f64 },
    SaturatedVapor,
    SuperheatedVapor,
    Supercritical,
    /// The saturation curve could not be evaluated at the resolved
    /// temperature (e.g. near the triple point); no guess is made.
    Indeterminate,
}

impl Region {
    /// True on the saturation boundary, including its liquid/vapor edges.
    pub fn is_saturation_boundary(&self) -> bool {
        matches!(
            self,
            Self::SaturatedLiquid | Self::SaturatedMixture { .. } | Self::SaturatedVapor
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompressedLiquid => write!(f, "compressed liquid"),
            Self::SaturatedLiquid => write!(f, "saturated liquid"),
            Self::SaturatedMixture { quality } => {
                write!(f, "saturated mixture (x={quality:.4})")
            }
            Self::SaturatedVapor => write!(f, "saturated vapor"),
            Self::SuperheatedVapor => write!(f, "superheated vapor"),
            Self::Supercritical => write!(f, "supercritical"),
            Self::Indeterminate => write!(f, "region indeterminate"),
        }
    }
}

/// Complete resolved equilibrium state of a pure fluid.
///
/// Invariants (upheld by the resolution pipeline):
/// - `quality` is `Some` exactly when `region` is `SaturatedMixture`, and
///   then lies in [0, 1];
/// - for saturation-boundary regions the pressure equals the saturation
///   pressure at `temperature` (the boundary snap is authoritative).
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub density: Density,
    pub enthalpy: SpecEnthalpy,
    pub internal_energy: SpecInternalEnergy,
    pub entropy: SpecEntropy,
    pub quality: Option<f64>,
    pub region: Region,
    pub convergence: Convergence,
}

impl FluidState {
    pub fn temperature_k(&self) -> f64 {
        self.temperature.get::<kelvin>()
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure.get::<pascal>()
    }

    pub fn density_kg_m3(&self) -> f64 {
        self.density.get::<kilogram_per_cubic_meter>()
    }

    pub fn specific_volume_m3_kg(&self) -> f64 {
        1.0 / self.density_kg_m3()
    }
}
