//! Joint (temperature, density) solve for pairs the backend cannot answer
//! directly and that do not contain specific volume.

use crate::config::{
    BEST_EFFORT_REL_TOL, NEWTON_MAX_ITER, NEWTON_RHO_MAX, NEWTON_RHO_MIN, NEWTON_SEEDS,
    NEWTON_T_MAX_K, NEWTON_T_MIN_K, residual_tolerance,
};
use crate::error::{ResolveError, ResolveResult};
use crate::fluid::FluidHandle;
use crate::oracle::{EosOracle, SaturationSide};
use crate::property::{PropertyCode, PropertyPair};
use crate::quality;
use crate::resolve::Resolved;
use crate::search::{self, Bracket};
use crate::state::Convergence;

pub(crate) fn resolve(
    oracle: &dyn EosOracle,
    handle: &FluidHandle,
    pair: &PropertyPair,
) -> ResolveResult<Resolved> {
    if pair.contains(PropertyCode::Quality) {
        return solve_on_saturation_line(oracle, handle, pair);
    }
    newton(oracle, handle, pair)
}

/// A quality entry pins the state to the dome, leaving one unknown: the
/// saturation temperature where the quality-mixed property hits its target.
fn solve_on_saturation_line(
    oracle: &dyn EosOracle,
    handle: &FluidHandle,
    pair: &PropertyPair,
) -> ResolveResult<Resolved> {
    let Some(q) = pair.value_of(PropertyCode::Quality) else {
        return Err(ResolveError::InvalidInput {
            what: "saturation-line solve requires a quality entry".into(),
        });
    };
    let Some((code, target)) = pair.other_than(PropertyCode::Quality) else {
        return Err(ResolveError::InvalidInput {
            what: "saturation-line solve requires a second property".into(),
        });
    };
    let fluid = handle.fluid();
    let mut residual = |t_k: f64| -> ResolveResult<f64> {
        let x_l = oracle.query(
            code,
            (PropertyCode::Temperature, t_k),
            (PropertyCode::Quality, 0.0),
            fluid,
        )?;
        let x_v = oracle.query(
            code,
            (PropertyCode::Temperature, t_k),
            (PropertyCode::Quality, 1.0),
            fluid,
        )?;
        Ok(quality::mix(q, x_l, x_v) - target)
    };
    let (t_k, convergence) = search::bisect_root(
        &mut residual,
        residual_tolerance(target),
        BEST_EFFORT_REL_TOL * target.abs().max(1.0),
        Bracket::saturation_temperature(handle),
    )?;
    let (p_sat, rho_l) = oracle.saturation(t_k, SaturationSide::Liquid, fluid)?;
    let (_, rho_v) = oracle.saturation(t_k, SaturationSide::Vapor, fluid)?;
    let v = quality::mix(q, 1.0 / rho_l, 1.0 / rho_v);
    Ok(Resolved {
        t_k,
        p_pa: p_sat,
        rho_hint: Some(1.0 / v),
        convergence,
    })
}

/// Damped Newton iteration over (T, rho) with a forward-difference Jacobian,
/// restarted from each fixed seed until one converges.
fn newton(
    oracle: &dyn EosOracle,
    handle: &FluidHandle,
    pair: &PropertyPair,
) -> ResolveResult<Resolved> {
    let (c1, x1) = pair.first();
    let (c2, x2) = pair.second();
    let fluid = handle.fluid();

    let eval = |code: PropertyCode, target: f64, t_k: f64, rho: f64| -> ResolveResult<f64> {
        let value = match code {
            PropertyCode::Temperature => t_k,
            _ => oracle.query(
                code,
                (PropertyCode::SpecificVolume, 1.0 / rho),
                (PropertyCode::Temperature, t_k),
                fluid,
            )?,
        };
        Ok(value - target)
    };

    let t_lo = handle.t_min_k().max(NEWTON_T_MIN_K);
    let t_hi = handle.t_max_k().min(NEWTON_T_MAX_K);

    'seeds: for (seed_t, seed_rho) in NEWTON_SEEDS {
        let mut t = seed_t.clamp(t_lo, t_hi);
        let mut rho = seed_rho;
        for iter in 0..NEWTON_MAX_ITER {
            let (f1, f2) = match (eval(c1, x1, t, rho), eval(c2, x2, t, rho)) {
                (Ok(a), Ok(b)) if a.is_finite() && b.is_finite() => (a, b),
                (Err(err), _) | (_, Err(err)) if err.is_recoverable() => return Err(err),
                _ => {
                    tracing::debug!(seed_t, seed_rho, iter, "joint residual failed; next seed");
                    continue 'seeds;
                }
            };
            if f1.abs() <= residual_tolerance(x1) && f2.abs() <= residual_tolerance(x2) {
                let p_pa = oracle.query(
                    PropertyCode::Pressure,
                    (PropertyCode::SpecificVolume, 1.0 / rho),
                    (PropertyCode::Temperature, t),
                    fluid,
                )?;
                return Ok(Resolved {
                    t_k: t,
                    p_pa,
                    rho_hint: Some(rho),
                    convergence: Convergence::Converged,
                });
            }

            let dt = (t * 1e-4).max(1e-3);
            let drho = (rho * 1e-4).max(1e-9);
            let (j11, j21) = match (eval(c1, x1, t + dt, rho), eval(c2, x2, t + dt, rho)) {
                (Ok(a), Ok(b)) => ((a - f1) / dt, (b - f2) / dt),
                _ => continue 'seeds,
            };
            let (j12, j22) = match (eval(c1, x1, t, rho + drho), eval(c2, x2, t, rho + drho)) {
                (Ok(a), Ok(b)) => ((a - f1) / drho, (b - f2) / drho),
                _ => continue 'seeds,
            };
            let det = j11 * j22 - j12 * j21;
            if !det.is_finite() || det.abs() < 1e-30 {
                continue 'seeds;
            }
            let step_t = ((j12 * f2 - j22 * f1) / det).clamp(-0.5 * t, 0.5 * t);
            let step_rho = ((j21 * f1 - j11 * f2) / det).clamp(-0.9 * rho, 0.9 * rho);
            t = (t + step_t).clamp(t_lo, t_hi);
            rho = (rho + step_rho).clamp(NEWTON_RHO_MIN, NEWTON_RHO_MAX);
        }

        // Iteration cap: a finite iterate within the loose tolerance is still
        // usable, flagged as best effort.
        if let (Ok(f1), Ok(f2)) = (eval(c1, x1, t, rho), eval(c2, x2, t, rho)) {
            let within_loose = f1.is_finite()
                && f2.is_finite()
                && f1.abs() <= BEST_EFFORT_REL_TOL * x1.abs().max(1.0)
                && f2.abs() <= BEST_EFFORT_REL_TOL * x2.abs().max(1.0);
            if within_loose {
                if let Ok(p_pa) = oracle.query(
                    PropertyCode::Pressure,
                    (PropertyCode::SpecificVolume, 1.0 / rho),
                    (PropertyCode::Temperature, t),
                    fluid,
                ) {
                    tracing::warn!(
                        seed_t,
                        seed_rho,
                        "joint solve hit its iteration cap; accepting best-effort state"
                    );
                    return Ok(Resolved {
                        t_k: t,
                        p_pa,
                        rho_hint: Some(rho),
                        convergence: Convergence::BestEffort,
                    });
                }
            }
        }
    }

    Err(ResolveError::SolverDivergence {
        what: "joint (T, rho) solve exhausted every seed".into(),
    })
}
