//! Lever-rule interpolation inside the two-phase dome.

use crate::config::QUALITY_EDGE_TOL;
use crate::error::{ResolveError, ResolveResult};

/// Vapor quality of a mixture at specific volume `v` between the saturated
/// liquid volume `v_l` and saturated vapor volume `v_v`.
///
/// Returns the raw lever-rule fraction clamped into [0, 1]; callers decide
/// whether an edge value means the boundary itself.
pub fn quality_from_volume(v: f64, v_l: f64, v_v: f64) -> ResolveResult<f64> {
    if !(v_l < v_v) {
        return Err(ResolveError::NonPhysical {
            what: "saturation volume ordering",
        });
    }
    let q = (v - v_l) / (v_v - v_l);
    Ok(q.clamp(0.0, 1.0))
}

/// Quality-weighted mixture value of a specific property with saturated
/// liquid value `x_l` and saturated vapor value `x_v`.
pub fn mix(q: f64, x_l: f64, x_v: f64) -> f64 {
    (1.0 - q) * x_l + q * x_v
}

/// True when `q` is within the edge tolerance of the saturated-liquid side.
pub fn at_liquid_edge(q: f64) -> bool {
    q <= QUALITY_EDGE_TOL
}

/// True when `q` is within the edge tolerance of the saturated-vapor side.
pub fn at_vapor_edge(q: f64) -> bool {
    q >= 1.0 - QUALITY_EDGE_TOL
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lever_rule_midpoint() {
        let q = quality_from_volume(0.5, 0.001, 0.999).unwrap();
        assert_relative_eq!(q, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn clamps_outside_dome() {
        assert_eq!(quality_from_volume(0.0005, 0.001, 1.0).unwrap(), 0.0);
        assert_eq!(quality_from_volume(2.0, 0.001, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn rejects_inverted_dome() {
        assert!(quality_from_volume(0.5, 1.0, 0.001).is_err());
    }

    #[test]
    fn mix_interpolates_endpoints() {
        assert_eq!(mix(0.0, 100.0, 2000.0), 100.0);
        assert_eq!(mix(1.0, 100.0, 2000.0), 2000.0);
        assert_relative_eq!(mix(0.25, 100.0, 2000.0), 575.0);
    }

    #[test]
    fn edge_detection() {
        assert!(at_liquid_edge(0.0));
        assert!(at_liquid_edge(1e-12));
        assert!(!at_liquid_edge(1e-6));
        assert!(at_vapor_edge(1.0));
        assert!(at_vapor_edge(1.0 - 1e-12));
        assert!(!at_vapor_edge(0.9999));
    }
}
