//! Display-unit conversion for caller-facing values.
//!
//! Resolvers operate strictly in SI; the surface layer speaks the usual
//! engineering units (°C, kPa, kJ/kg). Pure per-code lookup, no state.

use crate::property::PropertyCode;

/// Convert a caller-facing value in display units to SI.
pub fn to_si(code: PropertyCode, value: f64) -> f64 {
    match code {
        PropertyCode::Temperature => value + 273.15,
        PropertyCode::Pressure => value * 1.0e3,
        PropertyCode::Enthalpy | PropertyCode::InternalEnergy | PropertyCode::Entropy => {
            value * 1.0e3
        }
        PropertyCode::SpecificVolume | PropertyCode::Quality => value,
    }
}

/// Convert an SI value back to display units.
pub fn from_si(code: PropertyCode, value: f64) -> f64 {
    match code {
        PropertyCode::Temperature => value - 273.15,
        PropertyCode::Pressure => value / 1.0e3,
        PropertyCode::Enthalpy | PropertyCode::InternalEnergy | PropertyCode::Entropy => {
            value / 1.0e3
        }
        PropertyCode::SpecificVolume | PropertyCode::Quality => value,
    }
}

/// Display unit label for a property code.
pub fn display_unit(code: PropertyCode) -> &'static str {
    match code {
        PropertyCode::Temperature => "°C",
        PropertyCode::Pressure => "kPa",
        PropertyCode::Enthalpy | PropertyCode::InternalEnergy => "kJ/kg",
        PropertyCode::Entropy => "kJ/(kg·K)",
        PropertyCode::SpecificVolume => "m³/kg",
        PropertyCode::Quality => "-",
    }
}
