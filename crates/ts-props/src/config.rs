//! Solver and classifier tuning constants.
//!
//! Every tolerance and iteration budget lives here, not at the call sites.
//! The source history of this tool carried several drifting copies of these
//! values; the constants below are the single canonical set.

/// Relative deviation from the saturation pressure below which a resolved
/// (T, P) point is treated as sitting on the saturation boundary.
pub const SATURATION_REL_TOL: f64 = 1e-3;

/// Quality this close to 0 or 1 is reported as the saturated-liquid or
/// saturated-vapor boundary instead of a mixture.
pub const QUALITY_EDGE_TOL: f64 = 1e-9;

/// Target relative density error for the volume-branch pressure bisection.
pub const DENSITY_REL_TOL: f64 = 1e-6;

/// Looser bound that best-effort (iteration-capped) results must still meet.
pub const BEST_EFFORT_REL_TOL: f64 = 1e-3;

/// Iteration cap for 1-D bisection searches.
pub const BISECT_MAX_ITER: usize = 200;

/// Initial pressure bracket for the volume-branch search [Pa].
pub const PRESSURE_BRACKET_LO_PA: f64 = 100.0;
pub const PRESSURE_BRACKET_HI_PA: f64 = 1.0e8;

/// Hard caps the pressure bracket may expand to [Pa].
pub const PRESSURE_FLOOR_PA: f64 = 1.0e-2;
pub const PRESSURE_CEIL_PA: f64 = 1.0e10;

/// Initial temperature bracket for fixed-density searches [K].
pub const TEMPERATURE_BRACKET_LO_K: f64 = 150.0;
pub const TEMPERATURE_BRACKET_HI_K: f64 = 1500.0;

/// Hard caps the temperature bracket may expand to [K].
pub const TEMPERATURE_FLOOR_K: f64 = 2.0;
pub const TEMPERATURE_CEIL_K: f64 = 4000.0;

/// Geometric factor applied per bracket expansion step.
pub const BRACKET_EXPANSION: f64 = 10.0;

/// Number of outward expansions attempted before declaring divergence.
pub const MAX_BRACKET_EXPANSIONS: usize = 8;

/// Newton iteration cap per seed in the joint (T, rho) solver.
pub const NEWTON_MAX_ITER: usize = 50;

/// Joint-solver starting points (temperature [K], density [kg/m^3]) in
/// decreasing order of preference: gas-like, vapor-like, dense liquid, mid.
pub const NEWTON_SEEDS: [(f64, f64); 4] =
    [(300.0, 1.0), (500.0, 0.1), (350.0, 1000.0), (400.0, 10.0)];

/// Bounds the joint solver clamps its iterates to.
pub const NEWTON_T_MIN_K: f64 = 2.0;
pub const NEWTON_T_MAX_K: f64 = 4000.0;
pub const NEWTON_RHO_MIN: f64 = 1.0e-9;
pub const NEWTON_RHO_MAX: f64 = 5000.0;

/// Residual acceptance threshold scaled to the target magnitude.
pub fn residual_tolerance(target: f64) -> f64 {
    1e-6 * target.abs().max(1.0) + 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_are_ordered() {
        assert!(PRESSURE_FLOOR_PA < PRESSURE_BRACKET_LO_PA);
        assert!(PRESSURE_BRACKET_LO_PA < PRESSURE_BRACKET_HI_PA);
        assert!(PRESSURE_BRACKET_HI_PA < PRESSURE_CEIL_PA);
        assert!(TEMPERATURE_FLOOR_K < TEMPERATURE_BRACKET_LO_K);
        assert!(TEMPERATURE_BRACKET_HI_K < TEMPERATURE_CEIL_K);
    }

    #[test]
    fn residual_tolerance_scales_with_target() {
        assert!(residual_tolerance(0.0) < residual_tolerance(1.0e6));
        // Small targets keep the absolute floor.
        assert!(residual_tolerance(1e-12) >= 1e-3);
    }

    #[test]
    fn best_effort_tolerance_is_looser() {
        assert!(BEST_EFFORT_REL_TOL > DENSITY_REL_TOL);
    }
}
