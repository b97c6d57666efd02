//! psy-core: shared foundation for psychroflow.
//!
//! Contains:
//! - units (°C/K, percent and g/kg conversions through `uom`, physical constants)
//! - numeric (reporting precision and rounding)

pub mod numeric;
pub mod units;

pub use numeric::*;
pub use units::*;
