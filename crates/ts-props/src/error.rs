//! Resolution errors.

use ts_core::TsError;
use thiserror::Error;

/// Result type for state-resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that can occur while resolving a thermodynamic state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Caller supplied a malformed property pair (equal codes, non-finite or
    /// non-physical values). Rejected before any oracle call.
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// The oracle cannot compute the requested output from the given input
    /// pair. Recovered internally by falling through to the next resolver
    /// strategy; surfaced only when every strategy is exhausted.
    #[error("Unsupported oracle query: {what}")]
    UnsupportedQuery { what: String },

    /// Inputs lie outside the fluid's valid correlation domain. Never retried.
    #[error("Out of range: {what}")]
    OutOfRange { what: String },

    /// A bounded root search failed to bracket or converge within its budget.
    #[error("Solver divergence: {what}")]
    SolverDivergence { what: String },

    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl ResolveError {
    /// True for the one failure class the pipeline may recover from by
    /// trying another strategy.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnsupportedQuery { .. })
    }
}

impl From<TsError> for ResolveError {
    fn from(err: TsError) -> Self {
        match err {
            TsError::NonFinite { what, value } => ResolveError::InvalidInput {
                what: format!("{what} is not finite ({value})"),
            },
            TsError::InvalidArg { what } => ResolveError::InvalidInput {
                what: what.to_string(),
            },
            TsError::Invariant { what } => ResolveError::Backend {
                message: format!("invariant violated: {what}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ResolveError::SolverDivergence {
            what: "pressure bracket".into(),
        };
        assert!(err.to_string().contains("pressure bracket"));

        let err = ResolveError::Backend {
            message: "CoolProp failed".into(),
        };
        assert!(err.to_string().contains("CoolProp"));
    }

    #[test]
    fn only_unsupported_query_is_recoverable() {
        assert!(
            ResolveError::UnsupportedQuery {
                what: "H+U".into()
            }
            .is_recoverable()
        );
        assert!(
            !ResolveError::OutOfRange {
                what: "T".into()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn ts_error_maps_to_invalid_input() {
        let err: ResolveError = TsError::NonFinite {
            what: "temperature",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(err, ResolveError::InvalidInput { .. }));
    }
}
