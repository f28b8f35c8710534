//! Synthetic ideal-gas oracle with a linear saturation line.
//!
//! Deterministic stand-in backend for tests and experimentation. Single-phase
//! behavior follows P = rho*R*T; below the critical point a two-phase dome
//! hangs off the synthetic saturation line Psat(T) = slope*T, with an
//! incompressible saturated liquid.

use crate::error::{ResolveError, ResolveResult};
use crate::fluid::Fluid;
use crate::oracle::{EosOracle, SaturationSide};
use crate::property::PropertyCode;
use crate::quality;

/// Entropy reference state: s = 0 at (300 K, 1 bar).
const REF_T_K: f64 = 300.0;
const REF_P_PA: f64 = 1.0e5;

/// Ideal-gas equation-of-state backend with synthetic saturation behavior.
///
/// The same parameter set applies to every [`Fluid`]; the fluid tag is
/// ignored. Supported input pairs: (T, P), (V, T), (V, P), (T, Q), (P, Q).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealGasOracle {
    /// Critical temperature [K].
    pub t_crit_k: f64,
    /// Critical pressure [Pa].
    pub p_crit_pa: f64,
    /// Specific gas constant [J/(kg·K)].
    pub gas_constant: f64,
    /// Vapor-phase isobaric heat capacity [J/(kg·K)].
    pub cp_vapor: f64,
    /// Saturated-liquid heat capacity [J/(kg·K)].
    pub cp_liquid: f64,
    /// Slope of the linear saturation line [Pa/K].
    pub psat_slope: f64,
    /// Saturated-liquid density [kg/m³], temperature-independent.
    pub liquid_density: f64,
}

impl Default for IdealGasOracle {
    fn default() -> Self {
        Self {
            t_crit_k: 300.0,
            p_crit_pa: 5.0e6,
            gas_constant: 287.0,
            cp_vapor: 1005.0,
            cp_liquid: 4200.0,
            psat_slope: 1000.0,
            liquid_density: 1000.0,
        }
    }
}

impl IdealGasOracle {
    fn psat(&self, t_k: f64) -> f64 {
        self.psat_slope * t_k
    }

    fn rho_v_sat(&self, t_k: f64) -> f64 {
        self.psat(t_k) / (self.gas_constant * t_k)
    }

    fn v_liquid(&self) -> f64 {
        1.0 / self.liquid_density
    }

    fn v_vapor_sat(&self, t_k: f64) -> f64 {
        1.0 / self.rho_v_sat(t_k)
    }

    fn single_phase(&self, output: PropertyCode, t_k: f64, p_pa: f64) -> ResolveResult<f64> {
        let r = self.gas_constant;
        match output {
            PropertyCode::Temperature => Ok(t_k),
            PropertyCode::Pressure => Ok(p_pa),
            PropertyCode::SpecificVolume => Ok(r * t_k / p_pa),
            PropertyCode::Enthalpy => Ok(self.cp_vapor * t_k),
            PropertyCode::InternalEnergy => Ok((self.cp_vapor - r) * t_k),
            PropertyCode::Entropy => {
                Ok(self.cp_vapor * (t_k / REF_T_K).ln() - r * (p_pa / REF_P_PA).ln())
            }
            PropertyCode::Quality => Err(ResolveError::UnsupportedQuery {
                what: "quality outside the two-phase dome".into(),
            }),
        }
    }

    fn saturated(&self, output: PropertyCode, t_k: f64, q: f64) -> ResolveResult<f64> {
        if t_k >= self.t_crit_k {
            return Err(ResolveError::OutOfRange {
                what: format!("no saturation line at {t_k} K (above critical point)"),
            });
        }
        let r = self.gas_constant;
        let p_sat = self.psat(t_k);
        match output {
            PropertyCode::Temperature => Ok(t_k),
            PropertyCode::Pressure => Ok(p_sat),
            PropertyCode::SpecificVolume => {
                Ok(quality::mix(q, self.v_liquid(), self.v_vapor_sat(t_k)))
            }
            PropertyCode::Enthalpy => Ok(quality::mix(
                q,
                self.cp_liquid * t_k,
                self.cp_vapor * t_k,
            )),
            PropertyCode::InternalEnergy => Ok(quality::mix(
                q,
                self.cp_liquid * t_k,
                (self.cp_vapor - r) * t_k,
            )),
            PropertyCode::Entropy => Ok(quality::mix(
                q,
                self.cp_liquid * (t_k / REF_T_K).ln(),
                self.cp_vapor * (t_k / REF_T_K).ln() - r * (p_sat / REF_P_PA).ln(),
            )),
            PropertyCode::Quality => Ok(q),
        }
    }

    fn from_vt(&self, output: PropertyCode, v: f64, t_k: f64) -> ResolveResult<f64> {
        if t_k < self.t_crit_k {
            let v_l = self.v_liquid();
            let v_v = self.v_vapor_sat(t_k);
            if v_l <= v && v <= v_v {
                let q = (v - v_l) / (v_v - v_l);
                return self.saturated(output, t_k, q);
            }
        }
        self.single_phase(output, t_k, self.gas_constant * t_k / v)
    }
}

impl EosOracle for IdealGasOracle {
    fn name(&self) -> &str {
        "ideal-gas"
    }

    fn query(
        &self,
        output: PropertyCode,
        in1: (PropertyCode, f64),
        in2: (PropertyCode, f64),
        _fluid: Fluid,
    ) -> ResolveResult<f64> {
        let value_of = |code: PropertyCode| -> Option<f64> {
            [in1, in2]
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, v)| *v)
        };
        let t = value_of(PropertyCode::Temperature);
        let p = value_of(PropertyCode::Pressure);
        let v = value_of(PropertyCode::SpecificVolume);
        let q = value_of(PropertyCode::Quality);

        match (t, p, v, q) {
            (Some(t), Some(p), None, None) => self.single_phase(output, t, p),
            (Some(t), None, Some(v), None) => self.from_vt(output, v, t),
            (None, Some(p), Some(v), None) => {
                // A sub-critical (P, V) point inside the dome at T = P/slope
                // is saturated; anywhere else the single-phase law fixes T.
                let t_dome = p / self.psat_slope;
                if t_dome < self.t_crit_k {
                    let v_l = self.v_liquid();
                    let v_v = self.v_vapor_sat(t_dome);
                    if v_l <= v && v <= v_v {
                        let q = (v - v_l) / (v_v - v_l);
                        return self.saturated(output, t_dome, q);
                    }
                }
                self.single_phase(output, p * v / self.gas_constant, p)
            }
            (Some(t), None, None, Some(q)) => self.saturated(output, t, q),
            (None, Some(p), None, Some(q)) => self.saturated(output, p / self.psat_slope, q),
            _ => Err(ResolveError::UnsupportedQuery {
                what: format!(
                    "ideal-gas input pair {}+{}",
                    in1.0.short_code(),
                    in2.0.short_code()
                ),
            }),
        }
    }

    fn saturation(
        &self,
        t_k: f64,
        side: SaturationSide,
        _fluid: Fluid,
    ) -> ResolveResult<(f64, f64)> {
        if t_k >= self.t_crit_k {
            return Err(ResolveError::OutOfRange {
                what: format!("no saturation line at {t_k} K (above critical point)"),
            });
        }
        let p_sat = self.psat(t_k);
        let rho = match side {
            SaturationSide::Liquid => self.liquid_density,
            SaturationSide::Vapor => self.rho_v_sat(t_k),
        };
        Ok((p_sat, rho))
    }

    fn critical_point(&self, _fluid: Fluid) -> ResolveResult<(f64, f64)> {
        Ok((self.t_crit_k, self.p_crit_pa))
    }

    fn temperature_limits(&self, _fluid: Fluid) -> ResolveResult<(f64, f64)> {
        Ok((20.0, 2000.0))
    }
}
