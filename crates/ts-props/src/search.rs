//! Bracketed 1-D bisection with geometric bracket expansion.

use crate::config::{
    BISECT_MAX_ITER, BRACKET_EXPANSION, MAX_BRACKET_EXPANSIONS, PRESSURE_BRACKET_HI_PA,
    PRESSURE_BRACKET_LO_PA, PRESSURE_CEIL_PA, PRESSURE_FLOOR_PA, TEMPERATURE_BRACKET_HI_K,
    TEMPERATURE_BRACKET_LO_K, TEMPERATURE_CEIL_K, TEMPERATURE_FLOOR_K,
};
use crate::error::{ResolveError, ResolveResult};
use crate::fluid::FluidHandle;
use crate::state::Convergence;

/// Search interval plus the hard caps it may expand to.
pub(crate) struct Bracket {
    pub lo: f64,
    pub hi: f64,
    pub floor: f64,
    pub ceil: f64,
    pub what: &'static str,
}

impl Bracket {
    /// Wide pressure bracket for density inversion.
    pub fn pressure() -> Self {
        Self {
            lo: PRESSURE_BRACKET_LO_PA,
            hi: PRESSURE_BRACKET_HI_PA,
            floor: PRESSURE_FLOOR_PA,
            ceil: PRESSURE_CEIL_PA,
            what: "pressure",
        }
    }

    /// Temperature bracket clipped to the fluid's valid correlation range.
    pub fn temperature(handle: &FluidHandle) -> Self {
        let floor = handle.t_min_k().max(TEMPERATURE_FLOOR_K);
        let ceil = handle.t_max_k().min(TEMPERATURE_CEIL_K);
        let lo = TEMPERATURE_BRACKET_LO_K.clamp(floor, ceil);
        let hi = TEMPERATURE_BRACKET_HI_K.clamp(lo, ceil);
        Self {
            lo,
            hi,
            floor,
            ceil,
            what: "temperature",
        }
    }

    /// Temperature bracket restricted to the sub-critical range where the
    /// saturation curve exists.
    pub fn saturation_temperature(handle: &FluidHandle) -> Self {
        let floor = handle.t_min_k().max(TEMPERATURE_FLOOR_K);
        let ceil = handle.t_crit_k() * (1.0 - 1e-4);
        Self {
            lo: floor,
            hi: ceil,
            floor,
            ceil,
            what: "saturation temperature",
        }
    }
}

/// Find a root of `residual` inside `bracket` by bisection.
///
/// If the initial interval has no sign change, or an endpoint evaluation
/// fails, the interval expands geometrically toward the hard caps before the
/// search gives up. On iteration-cap exhaustion the best midpoint is still
/// returned, flagged [`Convergence::BestEffort`], as long as its residual is
/// within `best_effort_abs`.
///
/// An `UnsupportedQuery` from `residual` propagates immediately so callers
/// can route to a different formulation.
pub(crate) fn bisect_root(
    residual: &mut dyn FnMut(f64) -> ResolveResult<f64>,
    tol_abs: f64,
    best_effort_abs: f64,
    bracket: Bracket,
) -> ResolveResult<(f64, Convergence)> {
    let Bracket {
        mut lo,
        mut hi,
        floor,
        ceil,
        what,
    } = bracket;

    let mut res_lo = residual(lo);
    let mut res_hi = residual(hi);
    let mut expansions = 0;
    let mut f_lo = loop {
        if let (Ok(a), Ok(b)) = (&res_lo, &res_hi) {
            if a * b <= 0.0 {
                break *a;
            }
        }
        for res in [&res_lo, &res_hi] {
            if let Err(err) = res {
                if err.is_recoverable() {
                    return Err(err.clone());
                }
            }
        }
        let new_lo = (lo / BRACKET_EXPANSION).max(floor);
        let new_hi = (hi * BRACKET_EXPANSION).min(ceil);
        if expansions >= MAX_BRACKET_EXPANSIONS || (new_lo == lo && new_hi == hi) {
            return Err(ResolveError::SolverDivergence {
                what: format!("no {what} bracket contains a sign change"),
            });
        }
        expansions += 1;
        tracing::debug!(lo = new_lo, hi = new_hi, what, "expanding search bracket");
        lo = new_lo;
        hi = new_hi;
        res_lo = residual(lo);
        res_hi = residual(hi);
    };

    let mut best = (0.5 * (lo + hi), f64::INFINITY);
    for _ in 0..BISECT_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let f_mid = residual(mid)?;
        if f_mid.abs() < best.1 {
            best = (mid, f_mid.abs());
        }
        if f_mid.abs() <= tol_abs {
            return Ok((mid, Convergence::Converged));
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    if best.1 <= best_effort_abs {
        tracing::warn!(
            what,
            residual = best.1,
            "iteration cap reached; accepting best-effort root"
        );
        return Ok((best.0, Convergence::BestEffort));
    }
    Err(ResolveError::SolverDivergence {
        what: format!("{what} search exceeded its iteration budget"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bracket(what: &'static str) -> Bracket {
        Bracket {
            lo: 0.0,
            hi: 10.0,
            floor: 0.0,
            ceil: 100.0,
            what,
        }
    }

    #[test]
    fn finds_simple_root() {
        let mut f = |x: f64| Ok(x - 4.0);
        let (root, conv) = bisect_root(&mut f, 1e-9, 1e-6, unit_bracket("x")).unwrap();
        assert!((root - 4.0).abs() < 1e-8);
        assert_eq!(conv, Convergence::Converged);
    }

    #[test]
    fn expands_bracket_to_reach_root() {
        // Root at 50, outside the initial [0, 10] interval.
        let mut f = |x: f64| Ok(x - 50.0);
        let (root, conv) = bisect_root(&mut f, 1e-9, 1e-6, unit_bracket("x")).unwrap();
        assert!((root - 50.0).abs() < 1e-8);
        assert_eq!(conv, Convergence::Converged);
    }

    #[test]
    fn diverges_when_root_is_beyond_the_ceiling() {
        let mut f = |x: f64| Ok(x - 1.0e6);
        let err = bisect_root(&mut f, 1e-9, 1e-6, unit_bracket("x")).unwrap_err();
        assert!(matches!(err, ResolveError::SolverDivergence { .. }));
    }

    #[test]
    fn quantized_residual_yields_best_effort() {
        // Step function: residual never gets below the tight tolerance, but
        // the best midpoint lands within one step of the root.
        let mut f = |x: f64| Ok((x * 2.0).round() / 2.0 - 4.2);
        let (root, conv) = bisect_root(&mut f, 1e-9, 0.5, unit_bracket("x")).unwrap();
        assert_eq!(conv, Convergence::BestEffort);
        assert!((root - 4.2).abs() <= 0.5);
    }

    #[test]
    fn unsupported_query_propagates() {
        let mut f = |_x: f64| {
            Err(ResolveError::UnsupportedQuery {
                what: "test".into(),
            })
        };
        let err = bisect_root(&mut f, 1e-9, 1e-6, unit_bracket("x")).unwrap_err();
        assert!(err.is_recoverable());
    }
}
