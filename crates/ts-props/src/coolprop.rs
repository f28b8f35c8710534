//! CoolProp-backed equation-of-state oracle.

use crate::error::{ResolveError, ResolveResult};
use crate::fluid::Fluid;
use crate::oracle::{EosOracle, SaturationSide};
use crate::property::PropertyCode;
use rfluids::{
    io::{FluidInputPair, FluidParam, FluidTrivialParam},
    native::AbstractState,
};

/// CoolProp (HEOS backend) oracle for pure fluids.
///
/// A fresh `AbstractState` is created per call, so the oracle itself holds no
/// state and is trivially `Send + Sync`; rfluids serializes the underlying
/// CoolProp FFI calls through its own global mutex.
#[derive(Debug, Default)]
pub struct CoolPropOracle;

impl CoolPropOracle {
    pub fn new() -> Self {
        Self
    }

    fn state_for(&self, fluid: Fluid) -> ResolveResult<AbstractState> {
        AbstractState::new("HEOS", fluid.coolprop_name()).map_err(map_backend_error)
    }
}

impl EosOracle for CoolPropOracle {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn query(
        &self,
        output: PropertyCode,
        in1: (PropertyCode, f64),
        in2: (PropertyCode, f64),
        fluid: Fluid,
    ) -> ResolveResult<f64> {
        let (pair, first, second) = update_for(in1, in2)?;
        let mut state = self.state_for(fluid)?;
        state.update(pair, first, second).map_err(map_backend_error)?;
        let value = match output {
            PropertyCode::SpecificVolume => {
                let rho = state
                    .keyed_output(FluidParam::DMass)
                    .map_err(map_backend_error)?;
                if !rho.is_finite() || rho <= 0.0 {
                    return Err(ResolveError::NonPhysical { what: "density" });
                }
                1.0 / rho
            }
            other => state
                .keyed_output(output_param(other))
                .map_err(map_backend_error)?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ResolveError::NonPhysical {
                what: "oracle output",
            })
        }
    }

    fn saturation(
        &self,
        t_k: f64,
        side: SaturationSide,
        fluid: Fluid,
    ) -> ResolveResult<(f64, f64)> {
        let mut state = self.state_for(fluid)?;
        state
            .update(FluidInputPair::QT, side.quality(), t_k)
            .map_err(map_backend_error)?;
        let p_sat = state
            .keyed_output(FluidParam::P)
            .map_err(map_backend_error)?;
        let rho = state
            .keyed_output(FluidParam::DMass)
            .map_err(map_backend_error)?;
        if !(p_sat.is_finite() && p_sat > 0.0 && rho.is_finite() && rho > 0.0) {
            return Err(ResolveError::NonPhysical {
                what: "saturation state",
            });
        }
        Ok((p_sat, rho))
    }

    fn critical_point(&self, fluid: Fluid) -> ResolveResult<(f64, f64)> {
        let state = self.state_for(fluid)?;
        let t_crit = state
            .keyed_output(FluidTrivialParam::TCritical)
            .map_err(map_backend_error)?;
        let p_crit = state
            .keyed_output(FluidTrivialParam::PCritical)
            .map_err(map_backend_error)?;
        Ok((t_crit, p_crit))
    }

    fn temperature_limits(&self, fluid: Fluid) -> ResolveResult<(f64, f64)> {
        let state = self.state_for(fluid)?;
        let t_min = state
            .keyed_output(FluidTrivialParam::TMin)
            .map_err(map_backend_error)?;
        let t_max = state
            .keyed_output(FluidTrivialParam::TMax)
            .map_err(map_backend_error)?;
        Ok((t_min, t_max))
    }
}

/// Map an input pair, in either order, onto the CoolProp update pair and the
/// argument order it expects. Specific volume becomes mass density.
fn update_for(
    in1: (PropertyCode, f64),
    in2: (PropertyCode, f64),
) -> ResolveResult<(FluidInputPair, f64, f64)> {
    use PropertyCode as C;
    let (a, b) = if rank(in1.0) <= rank(in2.0) {
        (in1, in2)
    } else {
        (in2, in1)
    };
    let mapped = match (a.0, b.0) {
        (C::Temperature, C::Pressure) => (FluidInputPair::PT, b.1, a.1),
        (C::Temperature, C::SpecificVolume) => (FluidInputPair::DMassT, 1.0 / b.1, a.1),
        (C::Pressure, C::SpecificVolume) => (FluidInputPair::DMassP, 1.0 / b.1, a.1),
        (C::Pressure, C::Enthalpy) => (FluidInputPair::HMassP, b.1, a.1),
        (C::Pressure, C::Entropy) => (FluidInputPair::PSMass, a.1, b.1),
        (C::Enthalpy, C::Entropy) => (FluidInputPair::HMassSMass, a.1, b.1),
        (C::Temperature, C::Quality) => (FluidInputPair::QT, b.1, a.1),
        (C::Pressure, C::Quality) => (FluidInputPair::PQ, a.1, b.1),
        (code_a, code_b) => {
            return Err(ResolveError::UnsupportedQuery {
                what: format!(
                    "CoolProp input pair {}+{}",
                    code_a.short_code(),
                    code_b.short_code()
                ),
            });
        }
    };
    Ok(mapped)
}

fn rank(code: PropertyCode) -> usize {
    PropertyCode::ALL
        .iter()
        .position(|c| *c == code)
        .unwrap_or(usize::MAX)
}

fn output_param(code: PropertyCode) -> FluidParam {
    match code {
        PropertyCode::Temperature => FluidParam::T,
        PropertyCode::Pressure => FluidParam::P,
        PropertyCode::Enthalpy => FluidParam::HMass,
        PropertyCode::InternalEnergy => FluidParam::UMass,
        PropertyCode::Entropy => FluidParam::SMass,
        // SpecificVolume is handled by inverting DMass at the call site.
        PropertyCode::SpecificVolume => FluidParam::DMass,
        PropertyCode::Quality => FluidParam::Q,
    }
}

/// Classify an rfluids error by message. CoolProp exposes failures as opaque
/// strings with no structured codes, so substring matching is the best
/// available discrimination.
fn map_backend_error(err: rfluids::native::CoolPropError) -> ResolveError {
    classify_message(&err.to_string())
}

fn classify_message(message: &str) -> ResolveError {
    const UNSUPPORTED_MARKERS: &[&str] = &[
        "not implemented",
        "not supported",
        "invalid input pair",
        "no input pair",
        "cannot be used",
    ];
    const OUT_OF_RANGE_MARKERS: &[&str] = &[
        "not in range",
        "out of range",
        "outside the range of validity",
        "must be in range",
        "must be between",
        "quality must be",
        "below the triple point",
        "not defined",
    ];

    let lowered = message.to_lowercase();
    if contains_any(&lowered, UNSUPPORTED_MARKERS) {
        ResolveError::UnsupportedQuery {
            what: message.to_string(),
        }
    } else if contains_any(&lowered, OUT_OF_RANGE_MARKERS) {
        ResolveError::OutOfRange {
            what: message.to_string(),
        }
    } else {
        ResolveError::Backend {
            message: message.to_string(),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
