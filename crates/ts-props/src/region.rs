//! Phase-region classification of a resolved (T, P, v) point.

use crate::config::SATURATION_REL_TOL;
use crate::error::ResolveResult;
use crate::fluid::FluidHandle;
use crate::oracle::{EosOracle, SaturationSide};
use crate::quality;
use crate::state::Region;
use ts_core::numeric::relative_deviation;

/// Slack applied to the dome edges so a volume computed through a different
/// floating-point path than the saturation lookup still lands inside.
const DOME_EDGE_SLACK: f64 = 1e-9;

/// Classifier verdict. `pressure_pa` is the authoritative pressure: snapped
/// to the saturation pressure whenever the point sits on the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Classification {
    pub region: Region,
    pub pressure_pa: f64,
}

/// Classify the phase region of the point (T, P) with specific volume `v`.
///
/// The supercritical check runs first and wins outright; a failed saturation
/// lookup below the critical point yields `Region::Indeterminate` rather
/// than a guess.
pub(crate) fn classify(
    oracle: &dyn EosOracle,
    handle: &FluidHandle,
    t_k: f64,
    p_pa: f64,
    v_m3_kg: f64,
) -> ResolveResult<Classification> {
    if t_k >= handle.t_crit_k() || p_pa >= handle.p_crit_pa() {
        return Ok(Classification {
            region: Region::Supercritical,
            pressure_pa: p_pa,
        });
    }

    let liquid = oracle.saturation(t_k, SaturationSide::Liquid, handle.fluid());
    let vapor = oracle.saturation(t_k, SaturationSide::Vapor, handle.fluid());
    let ((p_sat, rho_l), (_, rho_v)) = match (liquid, vapor) {
        (Ok(l), Ok(v)) => (l, v),
        (l, v) => {
            tracing::debug!(
                t_k,
                liquid_err = l.is_err(),
                vapor_err = v.is_err(),
                "saturation lookup failed; region left indeterminate"
            );
            return Ok(Classification {
                region: Region::Indeterminate,
                pressure_pa: p_pa,
            });
        }
    };

    let v_l = 1.0 / rho_l;
    let v_v = 1.0 / rho_v;
    let on_boundary = relative_deviation(p_pa, p_sat) <= SATURATION_REL_TOL;
    let in_dome = v_m3_kg >= v_l * (1.0 - DOME_EDGE_SLACK)
        && v_m3_kg <= v_v * (1.0 + DOME_EDGE_SLACK);

    if on_boundary && in_dome {
        let q = quality::quality_from_volume(v_m3_kg, v_l, v_v)?;
        let region = if quality::at_liquid_edge(q) {
            Region::SaturatedLiquid
        } else if quality::at_vapor_edge(q) {
            Region::SaturatedVapor
        } else {
            Region::SaturatedMixture { quality: q }
        };
        return Ok(Classification {
            region,
            pressure_pa: p_sat,
        });
    }

    let region = if v_m3_kg < v_l {
        Region::CompressedLiquid
    } else {
        Region::SuperheatedVapor
    };
    Ok(Classification {
        region,
        pressure_pa: p_pa,
    })
}
