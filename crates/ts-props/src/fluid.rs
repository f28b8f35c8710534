//! Supported pure fluids and the per-fluid oracle context.

use crate::error::{ResolveError, ResolveResult};
use crate::oracle::EosOracle;
use std::fmt;
use std::str::FromStr;
use ts_core::numeric::ensure_finite;

/// Pure fluids the resolution core knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fluid {
    Water,
    Air,
    Nitrogen,
    Oxygen,
    CarbonDioxide,
    Methane,
    Ammonia,
    R134a,
    R22,
    R410a,
}

impl Fluid {
    pub const ALL: [Fluid; 10] = [
        Self::Water,
        Self::Air,
        Self::Nitrogen,
        Self::Oxygen,
        Self::CarbonDioxide,
        Self::Methane,
        Self::Ammonia,
        Self::R134a,
        Self::R22,
        Self::R410a,
    ];

    /// Fluid name as CoolProp expects it.
    pub fn coolprop_name(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Air => "Air",
            Self::Nitrogen => "Nitrogen",
            Self::Oxygen => "Oxygen",
            Self::CarbonDioxide => "CarbonDioxide",
            Self::Methane => "Methane",
            Self::Ammonia => "Ammonia",
            Self::R134a => "R134a",
            Self::R22 => "R22",
            Self::R410a => "R410A",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Air => "Air",
            Self::Nitrogen => "Nitrogen (N2)",
            Self::Oxygen => "Oxygen (O2)",
            Self::CarbonDioxide => "Carbon dioxide (CO2)",
            Self::Methane => "Methane (CH4)",
            Self::Ammonia => "Ammonia (NH3)",
            Self::R134a => "R134a",
            Self::R22 => "R22",
            Self::R410a => "R410A",
        }
    }
}

impl fmt::Display for Fluid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coolprop_name())
    }
}

impl FromStr for Fluid {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" | "h2o" => Ok(Self::Water),
            "air" => Ok(Self::Air),
            "nitrogen" | "n2" => Ok(Self::Nitrogen),
            "oxygen" | "o2" => Ok(Self::Oxygen),
            "carbondioxide" | "co2" => Ok(Self::CarbonDioxide),
            "methane" | "ch4" => Ok(Self::Methane),
            "ammonia" | "nh3" => Ok(Self::Ammonia),
            "r134a" => Ok(Self::R134a),
            "r22" => Ok(Self::R22),
            "r410a" => Ok(Self::R410a),
            other => Err(ResolveError::InvalidInput {
                what: format!("unknown fluid '{other}'"),
            }),
        }
    }
}

/// Per-fluid oracle context: the fluid tag plus its cached critical point
/// and valid temperature range.
///
/// Created once per fluid with two trivial oracle calls and passed by
/// reference into every resolver call; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidHandle {
    fluid: Fluid,
    t_crit_k: f64,
    p_crit_pa: f64,
    t_min_k: f64,
    t_max_k: f64,
}

impl FluidHandle {
    pub fn new(oracle: &dyn EosOracle, fluid: Fluid) -> ResolveResult<Self> {
        let (t_crit_k, p_crit_pa) = oracle.critical_point(fluid)?;
        ensure_finite(t_crit_k, "critical temperature")?;
        ensure_finite(p_crit_pa, "critical pressure")?;
        if t_crit_k <= 0.0 {
            return Err(ResolveError::NonPhysical {
                what: "critical temperature",
            });
        }
        if p_crit_pa <= 0.0 {
            return Err(ResolveError::NonPhysical {
                what: "critical pressure",
            });
        }
        let (t_min_k, t_max_k) = oracle.temperature_limits(fluid)?;
        if !(t_min_k.is_finite() && t_max_k.is_finite() && 0.0 < t_min_k && t_min_k < t_max_k) {
            return Err(ResolveError::NonPhysical {
                what: "temperature limits",
            });
        }
        Ok(Self {
            fluid,
            t_crit_k,
            p_crit_pa,
            t_min_k,
            t_max_k,
        })
    }

    pub fn fluid(&self) -> Fluid {
        self.fluid
    }

    pub fn t_crit_k(&self) -> f64 {
        self.t_crit_k
    }

    pub fn p_crit_pa(&self) -> f64 {
        self.p_crit_pa
    }

    pub fn t_min_k(&self) -> f64 {
        self.t_min_k
    }

    pub fn t_max_k(&self) -> f64 {
        self.t_max_k
    }
}
