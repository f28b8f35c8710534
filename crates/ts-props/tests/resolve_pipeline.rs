//! End-to-end resolution pipeline tests against the synthetic backend.
//!
//! The ideal-gas oracle makes every expected value computable by hand:
//! P = rho*R*T with R = 287, h = 1005*T in the vapor phase, a linear
//! saturation line Psat(T) = 1000*T below the 300 K critical point.

use approx::assert_relative_eq;
use ts_props::{
    Convergence, EosOracle, Fluid, FluidHandle, IdealGasOracle, PropertyCode, PropertyPair,
    Region, ResolveError, ResolveResult, SaturationSide, resolve, resolve_state,
};

const R: f64 = 287.0;
const CP: f64 = 1005.0;

fn pair(c1: PropertyCode, v1: f64, c2: PropertyCode, v2: f64) -> PropertyPair {
    PropertyPair::new(c1, v1, c2, v2).unwrap()
}

#[test]
fn round_trip_through_enthalpy_entropy() {
    let oracle = IdealGasOracle::default();
    let start = resolve(
        &oracle,
        Fluid::Air,
        &pair(PropertyCode::Temperature, 250.0, PropertyCode::Pressure, 1.0e5),
    )
    .unwrap();

    let back = resolve(
        &oracle,
        Fluid::Air,
        &pair(
            PropertyCode::Enthalpy,
            start.enthalpy,
            PropertyCode::Entropy,
            start.entropy,
        ),
    )
    .unwrap();

    assert_relative_eq!(back.temperature_k(), 250.0, max_relative = 1e-3);
    assert_relative_eq!(back.pressure_pa(), 1.0e5, max_relative = 1e-3);
}

#[test]
fn scenario_on_the_saturation_line() {
    // Psat(250) = 250 kPa, so this (T, P) input sits exactly on the line.
    let oracle = IdealGasOracle::default();
    let state = resolve(
        &oracle,
        Fluid::Air,
        &pair(
            PropertyCode::Temperature,
            250.0,
            PropertyCode::Pressure,
            250_000.0,
        ),
    )
    .unwrap();
    assert!(
        state.region.is_saturation_boundary(),
        "expected a boundary region, got {}",
        state.region
    );
}

#[test]
fn scenario_below_the_saturation_line() {
    // P < Psat(250): superheated vapor.
    let oracle = IdealGasOracle::default();
    let state = resolve(
        &oracle,
        Fluid::Air,
        &pair(
            PropertyCode::Temperature,
            250.0,
            PropertyCode::Pressure,
            100_000.0,
        ),
    )
    .unwrap();
    assert_eq!(state.region, Region::SuperheatedVapor);
    assert_eq!(state.quality, None);
}

#[test]
fn quality_edges_resolve_to_boundary_regions() {
    let oracle = IdealGasOracle::default();
    let liquid = resolve(
        &oracle,
        Fluid::Water,
        &pair(PropertyCode::Temperature, 250.0, PropertyCode::Quality, 0.0),
    )
    .unwrap();
    assert_eq!(liquid.region, Region::SaturatedLiquid);
    assert_eq!(liquid.quality, None);
    assert_relative_eq!(liquid.density_kg_m3(), 1000.0, max_relative = 1e-9);

    let vapor = resolve(
        &oracle,
        Fluid::Water,
        &pair(PropertyCode::Temperature, 250.0, PropertyCode::Quality, 1.0),
    )
    .unwrap();
    assert_eq!(vapor.region, Region::SaturatedVapor);
    assert_relative_eq!(
        vapor.density_kg_m3(),
        250_000.0 / (R * 250.0),
        max_relative = 1e-9
    );
}

#[test]
fn volume_at_the_liquid_edge_of_the_dome() {
    let oracle = IdealGasOracle::default();
    // v exactly equals the saturated-liquid volume at T=250 K.
    let state = resolve(
        &oracle,
        Fluid::Water,
        &pair(
            PropertyCode::SpecificVolume,
            1.0 / 1000.0,
            PropertyCode::Temperature,
            250.0,
        ),
    )
    .unwrap();
    assert_eq!(state.region, Region::SaturatedLiquid);
    // The boundary snap makes the saturation pressure authoritative.
    assert_relative_eq!(state.pressure_pa(), 250_000.0, max_relative = 1e-9);
}

#[test]
fn supercritical_dominates_the_saturation_check() {
    let oracle = IdealGasOracle::default();
    // T equals Tcrit exactly, and P happens to equal Psat(T): the critical
    // check must win.
    let state = resolve(
        &oracle,
        Fluid::Air,
        &pair(
            PropertyCode::Temperature,
            300.0,
            PropertyCode::Pressure,
            300_000.0,
        ),
    )
    .unwrap();
    assert_eq!(state.region, Region::Supercritical);
    assert_eq!(state.quality, None);
}

#[test]
fn resolution_is_deterministic() {
    let oracle = IdealGasOracle::default();
    let inputs = pair(
        PropertyCode::Enthalpy,
        CP * 250.0,
        PropertyCode::Entropy,
        CP * (250.0_f64 / 300.0).ln(),
    );
    let first = resolve(&oracle, Fluid::Air, &inputs).unwrap();
    let second = resolve(&oracle, Fluid::Air, &inputs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn handle_reuse_matches_fresh_resolution() {
    let oracle = IdealGasOracle::default();
    let handle = FluidHandle::new(&oracle, Fluid::Air).unwrap();
    let inputs = pair(PropertyCode::Temperature, 280.0, PropertyCode::Pressure, 5.0e4);
    let with_handle = resolve_state(&oracle, &handle, &inputs).unwrap();
    let fresh = resolve(&oracle, Fluid::Air, &inputs).unwrap();
    assert_eq!(with_handle, fresh);
}

#[test]
fn identical_codes_are_rejected_before_any_oracle_call() {
    let err = PropertyPair::new(
        PropertyCode::Pressure,
        1.0e5,
        PropertyCode::Pressure,
        2.0e5,
    )
    .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidInput { .. }));
}

// --- Best-effort policy -----------------------------------------------------

/// Backend whose (H, P) density answers snap to a coarse lattice, so the
/// pressure bisection can never satisfy its tight tolerance and must fall
/// back to the best midpoint.
struct QuantizedOracle {
    step: f64,
}

impl QuantizedOracle {
    fn temperature_of(h: f64) -> f64 {
        h / CP
    }
}

impl EosOracle for QuantizedOracle {
    fn name(&self) -> &str {
        "quantized-stub"
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
        let h = value_of(PropertyCode::Enthalpy);

        match (t, p, h) {
            (None, Some(p), Some(h)) => {
                let t = Self::temperature_of(h);
                match output {
                    PropertyCode::Temperature => Ok(t),
                    PropertyCode::SpecificVolume => {
                        let rho = (p / (R * t) / self.step).round() * self.step;
                        if rho <= 0.0 {
                            return Err(ResolveError::OutOfRange {
                                what: "density rounds to zero".into(),
                            });
                        }
                        Ok(1.0 / rho)
                    }
                    _ => Err(ResolveError::UnsupportedQuery {
                        what: "quantized stub output".into(),
                    }),
                }
            }
            (Some(t), Some(p), None) => match output {
                PropertyCode::Enthalpy => Ok(CP * t),
                PropertyCode::InternalEnergy => Ok((CP - R) * t),
                PropertyCode::Entropy => {
                    Ok(CP * (t / 300.0).ln() - R * (p / 1.0e5).ln())
                }
                PropertyCode::SpecificVolume => Ok(R * t / p),
                _ => Err(ResolveError::UnsupportedQuery {
                    what: "quantized stub output".into(),
                }),
            },
            _ => Err(ResolveError::UnsupportedQuery {
                what: "quantized stub input pair".into(),
            }),
        }
    }

    fn saturation(
        &self,
        _t_k: f64,
        _side: SaturationSide,
        _fluid: Fluid,
    ) -> ResolveResult<(f64, f64)> {
        Err(ResolveError::OutOfRange {
            what: "no saturation curve".into(),
        })
    }

    fn critical_point(&self, _fluid: Fluid) -> ResolveResult<(f64, f64)> {
        Ok((1000.0, 1.0e9))
    }

    fn temperature_limits(&self, _fluid: Fluid) -> ResolveResult<(f64, f64)> {
        Ok((20.0, 2000.0))
    }
}

#[test]
fn capped_bisection_returns_a_flagged_best_effort_state() {
    let oracle = QuantizedOracle { step: 2.0e-3 };
    let h_target = CP * 250.0;
    let v_target = 0.7123;
    let rho_target = 1.0 / v_target;

    let state = resolve(
        &oracle,
        Fluid::Air,
        &pair(
            PropertyCode::SpecificVolume,
            v_target,
            PropertyCode::Enthalpy,
            h_target,
        ),
    )
    .unwrap();

    assert_eq!(state.convergence, Convergence::BestEffort);
    // Saturation data is unavailable, so the classifier must not guess.
    assert_eq!(state.region, Region::Indeterminate);

    // Even on cap exhaustion the achieved density stays within the loose
    // secondary tolerance of the target.
    let v_achieved = oracle
        .query(
            PropertyCode::SpecificVolume,
            (PropertyCode::Enthalpy, h_target),
            (PropertyCode::Pressure, state.pressure_pa()),
            Fluid::Air,
        )
        .unwrap();
    let rho_achieved = 1.0 / v_achieved;
    assert!(
        ((rho_achieved - rho_target) / rho_target).abs() <= 1.0e-3,
        "best-effort density error too large: {rho_achieved} vs {rho_target}"
    );
    assert_relative_eq!(state.temperature_k(), 250.0, max_relative = 1e-9);
}

// --- Monotonicity -----------------------------------------------------------

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Density must be strictly increasing in pressure at fixed
        /// temperature, the property volume-branch bracketing relies on.
        #[test]
        fn density_increases_with_pressure(
            t in 320.0_f64..1500.0,
            p_lo in 1.0e3_f64..1.0e7,
            factor in 1.01_f64..100.0,
        ) {
            let oracle = IdealGasOracle::default();
            let p_hi = p_lo * factor;
            let lo = resolve(
                &oracle,
                Fluid::Air,
                &pair(PropertyCode::Temperature, t, PropertyCode::Pressure, p_lo),
            )
            .unwrap();
            let hi = resolve(
                &oracle,
                Fluid::Air,
                &pair(PropertyCode::Temperature, t, PropertyCode::Pressure, p_hi),
            )
            .unwrap();
            prop_assert!(hi.density_kg_m3() > lo.density_kg_m3());
        }
    }
}
