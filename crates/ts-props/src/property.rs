//! Property codes and the two-property input pair.

use crate::error::{ResolveError, ResolveResult};
use std::fmt;
use std::str::FromStr;

/// One intensive property, tagged with its SI unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyCode {
    Temperature,
    Pressure,
    Enthalpy,
    InternalEnergy,
    Entropy,
    SpecificVolume,
    Quality,
}

impl PropertyCode {
    pub const ALL: [PropertyCode; 7] = [
        Self::Temperature,
        Self::Pressure,
        Self::Enthalpy,
        Self::InternalEnergy,
        Self::Entropy,
        Self::SpecificVolume,
        Self::Quality,
    ];

    /// Single-letter code used on the command line.
    pub fn short_code(self) -> &'static str {
        match self {
            Self::Temperature => "T",
            Self::Pressure => "P",
            Self::Enthalpy => "H",
            Self::InternalEnergy => "U",
            Self::Entropy => "S",
            Self::SpecificVolume => "V",
            Self::Quality => "Q",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Pressure => "Pressure",
            Self::Enthalpy => "Specific enthalpy",
            Self::InternalEnergy => "Specific internal energy",
            Self::Entropy => "Specific entropy",
            Self::SpecificVolume => "Specific volume",
            Self::Quality => "Vapor quality",
        }
    }

    pub fn si_unit(self) -> &'static str {
        match self {
            Self::Temperature => "K",
            Self::Pressure => "Pa",
            Self::Enthalpy | Self::InternalEnergy => "J/kg",
            Self::Entropy => "J/(kg·K)",
            Self::SpecificVolume => "m³/kg",
            Self::Quality => "-",
        }
    }
}

impl fmt::Display for PropertyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

impl FromStr for PropertyCode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "T" | "TEMPERATURE" => Ok(Self::Temperature),
            "P" | "PRESSURE" => Ok(Self::Pressure),
            "H" | "ENTHALPY" => Ok(Self::Enthalpy),
            "U" | "INTERNALENERGY" | "INTERNAL_ENERGY" => Ok(Self::InternalEnergy),
            "S" | "ENTROPY" => Ok(Self::Entropy),
            "V" | "VOLUME" | "SPECIFICVOLUME" | "SPECIFIC_VOLUME" => Ok(Self::SpecificVolume),
            "Q" | "QUALITY" | "X" => Ok(Self::Quality),
            other => Err(ResolveError::InvalidInput {
                what: format!("unknown property code '{other}'"),
            }),
        }
    }
}

/// Two distinct intensive properties in SI units.
///
/// Validated at construction: codes must differ, values must be finite, and
/// values with a physical lower bound (T, P, V > 0; 0 <= Q <= 1) must honor it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyPair {
    entries: [(PropertyCode, f64); 2],
}

impl PropertyPair {
    pub fn new(c1: PropertyCode, v1: f64, c2: PropertyCode, v2: f64) -> ResolveResult<Self> {
        if c1 == c2 {
            return Err(ResolveError::InvalidInput {
                what: format!("property codes must differ (both {c1})"),
            });
        }
        for (code, value) in [(c1, v1), (c2, v2)] {
            validate_value(code, value)?;
        }
        Ok(Self {
            entries: [(c1, v1), (c2, v2)],
        })
    }

    pub fn first(&self) -> (PropertyCode, f64) {
        self.entries[0]
    }

    pub fn second(&self) -> (PropertyCode, f64) {
        self.entries[1]
    }

    pub fn contains(&self, code: PropertyCode) -> bool {
        self.entries.iter().any(|(c, _)| *c == code)
    }

    pub fn value_of(&self, code: PropertyCode) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, v)| *v)
    }

    /// The entry whose code is not `code`.
    pub fn other_than(&self, code: PropertyCode) -> Option<(PropertyCode, f64)> {
        self.entries.iter().copied().find(|(c, _)| *c != code)
    }

    /// True when the pair is exactly {a, b}, in either order.
    pub fn is_exactly(&self, a: PropertyCode, b: PropertyCode) -> bool {
        self.contains(a) && self.contains(b)
    }
}

fn validate_value(code: PropertyCode, value: f64) -> ResolveResult<()> {
    if !value.is_finite() {
        return Err(ResolveError::InvalidInput {
            what: format!("{} must be finite (got {value})", code.label()),
        });
    }
    match code {
        PropertyCode::Temperature | PropertyCode::Pressure | PropertyCode::SpecificVolume => {
            if value <= 0.0 {
                return Err(ResolveError::InvalidInput {
                    what: format!("{} must be positive (got {value})", code.label()),
                });
            }
        }
        PropertyCode::Quality => {
            if !(0.0..=1.0).contains(&value) {
                return Err(ResolveError::InvalidInput {
                    what: format!("vapor quality must be within [0, 1] (got {value})"),
                });
            }
        }
        // Enthalpy, internal energy and entropy may legitimately be negative.
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_codes() {
        assert_eq!(
            "T".parse::<PropertyCode>().unwrap(),
            PropertyCode::Temperature
        );
        assert_eq!("v".parse::<PropertyCode>().unwrap(), PropertyCode::SpecificVolume);
        assert_eq!("x".parse::<PropertyCode>().unwrap(), PropertyCode::Quality);
        assert!("Z".parse::<PropertyCode>().is_err());
    }

    #[test]
    fn create_valid_pair() {
        let pair = PropertyPair::new(
            PropertyCode::Temperature,
            300.0,
            PropertyCode::Pressure,
            101_325.0,
        )
        .unwrap();
        assert_eq!(pair.value_of(PropertyCode::Temperature), Some(300.0));
        assert_eq!(
            pair.other_than(PropertyCode::Temperature),
            Some((PropertyCode::Pressure, 101_325.0))
        );
        assert!(pair.is_exactly(PropertyCode::Pressure, PropertyCode::Temperature));
    }

    #[test]
    fn reject_equal_codes() {
        let err = PropertyPair::new(
            PropertyCode::Enthalpy,
            1.0e5,
            PropertyCode::Enthalpy,
            2.0e5,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidInput { .. }));
    }

    #[test]
    fn reject_non_finite() {
        let err = PropertyPair::new(
            PropertyCode::Temperature,
            f64::NAN,
            PropertyCode::Pressure,
            1.0e5,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidInput { .. }));
    }

    #[test]
    fn reject_non_physical() {
        assert!(
            PropertyPair::new(
                PropertyCode::Temperature,
                -10.0,
                PropertyCode::Pressure,
                1.0e5
            )
            .is_err()
        );
        assert!(
            PropertyPair::new(
                PropertyCode::Quality,
                1.5,
                PropertyCode::Temperature,
                300.0
            )
            .is_err()
        );
        // Negative enthalpy is allowed.
        assert!(
            PropertyPair::new(
                PropertyCode::Enthalpy,
                -5.0e4,
                PropertyCode::Pressure,
                1.0e5
            )
            .is_ok()
        );
    }
}
