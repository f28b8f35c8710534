//! ts-props: any-pair thermodynamic state resolution for pure fluids.
//!
//! Given any two independent intensive properties of a pure fluid
//! (temperature, pressure, enthalpy, internal energy, entropy, specific
//! volume, vapor quality), resolve the complete equilibrium state: (T, P),
//! density, the caloric properties, the phase region, and the vapor quality
//! when the state sits inside the two-phase dome.
//!
//! The crate never implements an equation of state of its own. All property
//! knowledge comes from an [`EosOracle`] backend that is queried point by
//! point; the resolvers only orchestrate those queries:
//! - a direct query with the raw pair,
//! - a 1-D root search when one input is specific volume,
//! - a joint (T, rho) Newton solve for everything else.
//!
//! Two backends ship with the crate: [`CoolPropOracle`] (real fluids via
//! CoolProp) and [`IdealGasOracle`] (synthetic, deterministic, used heavily
//! in tests).
//!
//! # Example
//!
//! ```
//! use ts_props::{Fluid, IdealGasOracle, PropertyCode, PropertyPair, Region, resolve};
//!
//! let oracle = IdealGasOracle::default();
//! let pair = PropertyPair::new(
//!     PropertyCode::Temperature,
//!     250.0,
//!     PropertyCode::Pressure,
//!     1.0e5,
//! )
//! .unwrap();
//!
//! let state = resolve(&oracle, Fluid::Air, &pair).unwrap();
//! assert_eq!(state.region, Region::SuperheatedVapor);
//! ```

pub mod config;
pub mod coolprop;
pub mod error;
pub mod fluid;
pub mod ideal;
pub mod oracle;
pub mod property;
pub mod quality;
pub mod resolve;
pub mod state;
pub mod units;

mod joint;
mod region;
mod search;
mod volume;

// Re-exports for ergonomics
pub use coolprop::CoolPropOracle;
pub use error::{ResolveError, ResolveResult};
pub use fluid::{Fluid, FluidHandle};
pub use ideal::IdealGasOracle;
pub use oracle::{EosOracle, SaturationSide};
pub use property::{PropertyCode, PropertyPair};
pub use resolve::{resolve, resolve_state};
pub use state::{
    Convergence, FluidState, Region, SpecEnthalpy, SpecEntropy, SpecInternalEnergy,
};
