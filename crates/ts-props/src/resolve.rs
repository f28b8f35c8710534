//! Ordered strategy pipeline turning a property pair into a full state.

use crate::error::{ResolveError, ResolveResult};
use crate::fluid::{Fluid, FluidHandle};
use crate::joint;
use crate::oracle::EosOracle;
use crate::property::{PropertyCode, PropertyPair};
use crate::quality;
use crate::region;
use crate::state::{Convergence, FluidState, Region};
use crate::volume;
use ts_core::units::{k, kg_m3, pa};

/// Raw (T, P) outcome of one resolver strategy, before state assembly.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolved {
    pub t_k: f64,
    pub p_pa: f64,
    /// Density already known by the strategy. Authoritative for in-dome
    /// states, where a (T, P) density query is ambiguous.
    pub rho_hint: Option<f64>,
    pub convergence: Convergence,
}

/// Tagged verdict of one strategy in the ordered pipeline.
enum StrategyOutcome {
    Solved(Resolved),
    Skip,
    Fail(ResolveError),
}

/// Resolve the full equilibrium state for `pair`, reusing a prebuilt handle.
///
/// Strategies run in order: direct oracle query, volume branch (when the
/// pair contains specific volume), joint (T, rho) solve. An unsupported
/// direct query falls through; every other failure is terminal.
pub fn resolve_state(
    oracle: &dyn EosOracle,
    handle: &FluidHandle,
    pair: &PropertyPair,
) -> ResolveResult<FluidState> {
    let resolved = match direct(oracle, handle, pair) {
        StrategyOutcome::Solved(resolved) => resolved,
        StrategyOutcome::Fail(err) => return Err(err),
        StrategyOutcome::Skip => {
            if volume::applies(pair) {
                tracing::debug!(
                    backend = oracle.name(),
                    "direct query unsupported; trying volume branch"
                );
                volume::resolve(oracle, handle, pair)?
            } else {
                tracing::debug!(
                    backend = oracle.name(),
                    "direct query unsupported; trying joint solve"
                );
                joint::resolve(oracle, handle, pair)?
            }
        }
    };
    assemble(oracle, handle, resolved)
}

/// Resolve the full equilibrium state of `fluid` for one property pair.
pub fn resolve(
    oracle: &dyn EosOracle,
    fluid: Fluid,
    pair: &PropertyPair,
) -> ResolveResult<FluidState> {
    let handle = FluidHandle::new(oracle, fluid)?;
    resolve_state(oracle, &handle, pair)
}

/// A (T, P) pair needs no oracle call at all; anything else is one raw
/// query per missing coordinate.
fn direct(oracle: &dyn EosOracle, handle: &FluidHandle, pair: &PropertyPair) -> StrategyOutcome {
    let fluid = handle.fluid();
    let in1 = pair.first();
    let in2 = pair.second();

    let t_k = match pair.value_of(PropertyCode::Temperature) {
        Some(t_k) => t_k,
        None => match oracle.query(PropertyCode::Temperature, in1, in2, fluid) {
            Ok(t_k) => t_k,
            Err(err) if err.is_recoverable() => return StrategyOutcome::Skip,
            Err(err) => return StrategyOutcome::Fail(err),
        },
    };
    let p_pa = match pair.value_of(PropertyCode::Pressure) {
        Some(p_pa) => p_pa,
        None => match oracle.query(PropertyCode::Pressure, in1, in2, fluid) {
            Ok(p_pa) => p_pa,
            Err(err) if err.is_recoverable() => return StrategyOutcome::Skip,
            Err(err) => return StrategyOutcome::Fail(err),
        },
    };

    // Density straight from the raw pair keeps in-dome inputs exact.
    let rho_hint = oracle
        .query(PropertyCode::SpecificVolume, in1, in2, fluid)
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(f64::recip);

    StrategyOutcome::Solved(Resolved {
        t_k,
        p_pa,
        rho_hint,
        convergence: Convergence::Converged,
    })
}

/// Fill in the remaining properties, classify the region, and snap the
/// pressure to the saturation line when the classifier says so.
fn assemble(
    oracle: &dyn EosOracle,
    handle: &FluidHandle,
    resolved: Resolved,
) -> ResolveResult<FluidState> {
    let Resolved {
        t_k,
        p_pa,
        rho_hint,
        convergence,
    } = resolved;
    if !(t_k.is_finite() && p_pa.is_finite() && t_k > 0.0 && p_pa > 0.0) {
        return Err(ResolveError::NonPhysical {
            what: "resolved temperature or pressure",
        });
    }
    let fluid = handle.fluid();

    let rho = match rho_hint {
        Some(rho) if rho.is_finite() && rho > 0.0 => rho,
        _ => {
            let v = oracle.query(
                PropertyCode::SpecificVolume,
                (PropertyCode::Temperature, t_k),
                (PropertyCode::Pressure, p_pa),
                fluid,
            )?;
            if !v.is_finite() || v <= 0.0 {
                return Err(ResolveError::NonPhysical {
                    what: "specific volume",
                });
            }
            1.0 / v
        }
    };
    let v = 1.0 / rho;

    let classification = region::classify(oracle, handle, t_k, p_pa, v)?;
    let region = classification.region;
    let p_pa = classification.pressure_pa;

    let (enthalpy, internal_energy, entropy, quality) = if let Some(q) = boundary_quality(&region)
    {
        let (h_l, u_l, s_l) = saturated_properties(oracle, fluid, t_k, 0.0)?;
        let (h_v, u_v, s_v) = saturated_properties(oracle, fluid, t_k, 1.0)?;
        (
            quality::mix(q, h_l, h_v),
            quality::mix(q, u_l, u_v),
            quality::mix(q, s_l, s_v),
            matches!(region, Region::SaturatedMixture { .. }).then_some(q),
        )
    } else {
        let h = oracle.query(
            PropertyCode::Enthalpy,
            (PropertyCode::Temperature, t_k),
            (PropertyCode::Pressure, p_pa),
            fluid,
        )?;
        let u = oracle.query(
            PropertyCode::InternalEnergy,
            (PropertyCode::Temperature, t_k),
            (PropertyCode::Pressure, p_pa),
            fluid,
        )?;
        let s = oracle.query(
            PropertyCode::Entropy,
            (PropertyCode::Temperature, t_k),
            (PropertyCode::Pressure, p_pa),
            fluid,
        )?;
        (h, u, s, None)
    };

    Ok(FluidState {
        temperature: k(t_k),
        pressure: pa(p_pa),
        density: kg_m3(rho),
        enthalpy,
        internal_energy,
        entropy,
        quality,
        region,
        convergence,
    })
}

fn boundary_quality(region: &Region) -> Option<f64> {
    match region {
        Region::SaturatedLiquid => Some(0.0),
        Region::SaturatedVapor => Some(1.0),
        Region::SaturatedMixture { quality } => Some(*quality),
        _ => None,
    }
}

fn saturated_properties(
    oracle: &dyn EosOracle,
    fluid: Fluid,
    t_k: f64,
    q: f64,
) -> ResolveResult<(f64, f64, f64)> {
    let h = oracle.query(
        PropertyCode::Enthalpy,
        (PropertyCode::Temperature, t_k),
        (PropertyCode::Quality, q),
        fluid,
    )?;
    let u = oracle.query(
        PropertyCode::InternalEnergy,
        (PropertyCode::Temperature, t_k),
        (PropertyCode::Quality, q),
        fluid,
    )?;
    let s = oracle.query(
        PropertyCode::Entropy,
        (PropertyCode::Temperature, t_k),
        (PropertyCode::Quality, q),
        fluid,
    )?;
    Ok((h, u, s))
}
