use crate::TsError;

/// Floating point type used throughout the system.
pub type Real = f64;

/// Relative deviation of `a` from `b`, guarding against small denominators.
pub fn relative_deviation(a: Real, b: Real) -> Real {
    (a - b).abs() / b.abs().max(1.0)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TsError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_deviation_guards_small_denominator() {
        assert_eq!(relative_deviation(0.5, 0.0), 0.5);
        assert!((relative_deviation(110.0, 100.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_finite_passes_values_through() {
        assert_eq!(ensure_finite(1.25, "x").unwrap(), 1.25);
    }
}
