//! Equation-of-state oracle trait.

use crate::error::ResolveResult;
use crate::fluid::Fluid;
use crate::property::PropertyCode;

/// Which edge of the two-phase dome a saturation query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaturationSide {
    Liquid,
    Vapor,
}

impl SaturationSide {
    /// Vapor quality at this edge.
    pub fn quality(self) -> f64 {
        match self {
            Self::Liquid => 0.0,
            Self::Vapor => 1.0,
        }
    }
}

/// Point-query interface to an external equation-of-state backend.
///
/// The resolution core orchestrates calls against this trait and never
/// implements correlations of its own. Implementations must be stateless
/// per call (no shared mutable cache) and `Send + Sync` so independent
/// requests may run concurrently.
///
/// `query` fails with [`ResolveError::UnsupportedQuery`] when the backend
/// cannot compute `output` from that input pair; the resolvers treat that
/// as recoverable and route around it. [`ResolveError::OutOfRange`] means
/// the fluid's correlation is not valid at the requested point and is
/// terminal.
///
/// [`ResolveError::UnsupportedQuery`]: crate::error::ResolveError::UnsupportedQuery
/// [`ResolveError::OutOfRange`]: crate::error::ResolveError::OutOfRange
pub trait EosOracle: Send + Sync {
    /// Get the backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Compute `output` (SI value) from two independent property inputs.
    fn query(
        &self,
        output: PropertyCode,
        in1: (PropertyCode, f64),
        in2: (PropertyCode, f64),
        fluid: Fluid,
    ) -> ResolveResult<f64>;

    /// Saturation pressure [Pa] and density [kg/m³] of the requested phase
    /// edge at temperature `t_k`.
    fn saturation(
        &self,
        t_k: f64,
        side: SaturationSide,
        fluid: Fluid,
    ) -> ResolveResult<(f64, f64)>;

    /// Critical point (T [K], P [Pa]) of the fluid.
    fn critical_point(&self, fluid: Fluid) -> ResolveResult<(f64, f64)>;

    /// Valid temperature range (min, max) of the fluid's correlation [K].
    /// Root searches bracket inside this range.
    fn temperature_limits(&self, fluid: Fluid) -> ResolveResult<(f64, f64)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_side_quality() {
        assert_eq!(SaturationSide::Liquid.quality(), 0.0);
        assert_eq!(SaturationSide::Vapor.quality(), 1.0);
    }
}
