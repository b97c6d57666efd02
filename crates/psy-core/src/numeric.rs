/// Reporting precision for temperatures, relative humidity and enthalpy.
pub const REPORT_DECIMALS: u32 = 2;

/// Reporting precision for humidity ratio (g/kg).
pub const HUMIDITY_RATIO_DECIMALS: u32 = 3;

/// Round half away from zero to a fixed number of decimals.
///
/// Reporting only. Anything that feeds further arithmetic must keep the
/// unrounded value.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounding_error_is_bounded(v in -1.0e4_f64..1.0e4_f64, decimals in 0u32..4) {
            let rounded = round_to(v, decimals);
            let half_step = 0.5 * 10f64.powi(-(decimals as i32));
            prop_assert!((rounded - v).abs() <= half_step + 1e-9);
        }
    }
}
