//! Unit conversions at the reporting boundary.
//!
//! Evaluators work in SI (K, fraction, kg/kg, J/kg); reports use °C, %, g/kg
//! and kJ/kg.

use uom::si::f64::{Ratio, ThermodynamicTemperature as Temperature};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

#[inline]
pub fn k(v: f64) -> Temperature {
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Absolute temperature [K] to Celsius [°C].
#[inline]
pub fn kelvin_to_celsius(t_k: f64) -> f64 {
    k(t_k).get::<degree_celsius>()
}

/// Celsius [°C] to absolute temperature [K].
#[inline]
pub fn celsius_to_kelvin(t_c: f64) -> f64 {
    degc(t_c).get::<kelvin>()
}

/// Fraction [0-1] to percent [0-100].
#[inline]
pub fn fraction_to_percent(v: f64) -> f64 {
    use uom::si::ratio::percent;
    unitless(v).get::<percent>()
}

/// Humidity ratio [kg/kg] to [g/kg].
#[inline]
pub fn kg_per_kg_to_g_per_kg(w: f64) -> f64 {
    w * 1000.0
}

/// Humidity ratio [g/kg] to [kg/kg].
#[inline]
pub fn g_per_kg_to_kg_per_kg(w: f64) -> f64 {
    w / 1000.0
}

/// Specific enthalpy [J/kg] to [kJ/kg].
#[inline]
pub fn j_to_kj(h: f64) -> f64 {
    h / 1000.0
}

pub mod constants {
    /// Standard atmosphere [Pa].
    pub const STANDARD_ATMOSPHERE_PA: f64 = 101_325.0;

    /// Offset between the Kelvin and Celsius scales.
    pub const ZERO_CELSIUS_K: f64 = 273.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_scales_roundtrip() {
        assert!((kelvin_to_celsius(298.15) - 25.0).abs() < 1e-9);
        assert!((celsius_to_kelvin(-10.0) - 263.15).abs() < 1e-9);
        assert!((celsius_to_kelvin(kelvin_to_celsius(301.7)) - 301.7).abs() < 1e-9);
    }

    #[test]
    fn reporting_scales() {
        assert!((fraction_to_percent(0.6) - 60.0).abs() < 1e-9);
        assert!((kg_per_kg_to_g_per_kg(0.0119) - 11.9).abs() < 1e-9);
        assert!((g_per_kg_to_kg_per_kg(11.9) - 0.0119).abs() < 1e-12);
        assert!((j_to_kj(55_400.0) - 55.4).abs() < 1e-9);
    }
}
