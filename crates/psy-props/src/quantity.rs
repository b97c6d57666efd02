//! Humid-air quantity codes.
//!
//! Codes and canonical units follow the HAPropsSI convention:
//!
//! | Code | Quantity | Unit |
//! |------|----------|------|
//! | `P` | Total pressure | Pa |
//! | `T` | Dry-bulb temperature | K |
//! | `B` | Wet-bulb temperature | K |
//! | `R` | Relative humidity | fraction 0-1 |
//! | `W` | Humidity ratio | kg water / kg dry air |
//! | `H` | Enthalpy per unit dry air | J/kg dry air |
//! | `D` | Dew-point temperature | K |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A humid-air state quantity.
///
/// Ordering is pressure first, then the state quantities in the order a
/// resolved state reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quantity {
    P,
    T,
    B,
    R,
    W,
    H,
    D,
}

impl Quantity {
    /// Every state quantity other than pressure, in reporting order.
    pub const STATE: [Quantity; 6] = [
        Quantity::T,
        Quantity::B,
        Quantity::R,
        Quantity::W,
        Quantity::H,
        Quantity::D,
    ];

    /// Single-letter code understood by HAPropsSI.
    pub fn code(self) -> &'static str {
        match self {
            Self::P => "P",
            Self::T => "T",
            Self::B => "B",
            Self::R => "R",
            Self::W => "W",
            Self::H => "H",
            Self::D => "D",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::P => "Pressure [Pa]",
            Self::T => "Dry-bulb temperature [K]",
            Self::B => "Wet-bulb temperature [K]",
            Self::R => "Relative humidity [-]",
            Self::W => "Humidity ratio [kg/kg]",
            Self::H => "Enthalpy [J/kg]",
            Self::D => "Dew-point temperature [K]",
        }
    }

    pub fn is_pressure(self) -> bool {
        self == Self::P
    }

    /// True for the three absolute temperatures (dry bulb, wet bulb, dew point).
    pub fn is_temperature(self) -> bool {
        matches!(self, Self::T | Self::B | Self::D)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "P" => Ok(Self::P),
            "T" | "Tdb" => Ok(Self::T),
            "B" | "Twb" => Ok(Self::B),
            "R" | "RH" => Ok(Self::R),
            "W" => Ok(Self::W),
            "H" | "Hda" => Ok(Self::H),
            "D" | "Tdp" => Ok(Self::D),
            other => Err(format!("unknown quantity code '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn codes_roundtrip_through_from_str() {
        for q in [Quantity::P].into_iter().chain(Quantity::STATE) {
            assert_eq!(q.code().parse::<Quantity>().unwrap(), q);
        }
        assert_eq!("Twb".parse::<Quantity>().unwrap(), Quantity::B);
        assert!("X".parse::<Quantity>().is_err());
    }

    #[test]
    fn pressure_sorts_first() {
        let mut codes = vec![Quantity::D, Quantity::R, Quantity::P, Quantity::T];
        codes.sort();
        assert_eq!(codes, vec![Quantity::P, Quantity::T, Quantity::R, Quantity::D]);
    }

    #[test]
    fn deserializes_as_map_keys() {
        let map: BTreeMap<Quantity, f64> =
            serde_json::from_str(r#"{"P": 101325.0, "T": 298.15, "R": 0.6}"#).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map[&Quantity::R], 0.6);

        let bad: Result<BTreeMap<Quantity, f64>, _> = serde_json::from_str(r#"{"X": 1.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn temperature_codes() {
        assert!(Quantity::T.is_temperature());
        assert!(Quantity::B.is_temperature());
        assert!(Quantity::D.is_temperature());
        assert!(!Quantity::W.is_temperature());
        assert!(Quantity::P.is_pressure());
    }
}
