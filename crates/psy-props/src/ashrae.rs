//! Pure-Rust humid-air model after the ASHRAE Handbook - Fundamentals (SI).
//!
//! Every known pair is first reduced to dry-bulb temperature and humidity
//! ratio, in closed form where the relations allow it and by bracketed
//! bisection otherwise. All other quantities are then derived from (T, W).
//!
//! Relations used:
//! - saturation vapour pressure over ice below 0 °C and over liquid water
//!   above it (Hyland-Wexler), valid 173.15 K to 473.15 K
//! - `W = 0.621945 * pw / (P - pw)`
//! - `h = 1.006 t + W (2501 + 1.86 t)` kJ/kg dry air, t in °C
//! - the psychrometric wet-bulb relation, liquid and ice branches
//!
//! States at or above the boiling point of water at the given pressure are
//! outside this model's domain.

use crate::error::{PropertyError, PropertyResult};
use crate::evaluator::validation::{self, SplitKnowns};
use crate::evaluator::{KnownQuantities, PropertyEvaluator};
use crate::quantity::Quantity;
use psy_core::units::constants::ZERO_CELSIUS_K;

/// Lower bound of the saturation correlations [K].
pub const T_MIN_K: f64 = 173.15;
/// Upper bound of the saturation correlations [K].
pub const T_MAX_K: f64 = 473.15;

/// Ratio of the molar masses of water and dry air.
const EPSILON: f64 = 0.621945;
const MAX_ITER: usize = 200;
const T_TOL_K: f64 = 1e-10;
/// Humidity ratios within this band above saturation are clamped to it, so
/// states reported at 0.01 K and 0.001 g/kg resolve again.
const SATURATION_REL_TOL: f64 = 1e-3;
const SATURATION_ABS_TOL: f64 = 1e-6;

/// ASHRAE Fundamentals psychrometric model.
///
/// Stateless: safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AshraeModel {}

impl AshraeModel {
    /// Create a new ASHRAE model.
    pub fn new() -> Self {
        Self {}
    }

    /// Reduce the knowns to a validated (P, T, W) state.
    pub fn moist_air(&self, known: &KnownQuantities) -> PropertyResult<MoistAir> {
        let split = validation::split_knowns(known)?;
        validate_known(split.first)?;
        validate_known(split.second)?;
        let (t_k, w) = reduce(split)?;
        MoistAir::new(split.pressure, t_k, w)
    }
}

impl PropertyEvaluator for AshraeModel {
    fn name(&self) -> &str {
        "ashrae"
    }

    fn evaluate(&self, target: Quantity, known: &KnownQuantities) -> PropertyResult<f64> {
        self.moist_air(known)?.get(target)
    }
}

/// Moist air reduced to pressure [Pa], dry-bulb temperature [K] and humidity
/// ratio [kg/kg].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistAir {
    pub p: f64,
    pub t_k: f64,
    pub w: f64,
}

impl MoistAir {
    /// Validates that the state lies inside the model domain and is not
    /// supersaturated. A humidity ratio marginally above saturation is taken
    /// as saturated.
    pub fn new(p: f64, t_k: f64, w: f64) -> PropertyResult<Self> {
        validation::validate_pressure(p)?;
        validate_temperature("dry-bulb temperature", t_k)?;
        validation::validate_humidity_ratio(w)?;

        let pws = saturation_pressure(t_k)?;
        if pws >= p {
            return Err(PropertyError::OutOfRange {
                what: "dry-bulb temperature at or above the boiling point",
                value: t_k,
            });
        }
        let ws = humidity_ratio_from_vapour_pressure(pws, p)?;
        if w > ws * (1.0 + SATURATION_REL_TOL) + SATURATION_ABS_TOL {
            return Err(PropertyError::Supersaturated {
                what: "humidity ratio above saturation",
            });
        }
        Ok(Self {
            p,
            t_k,
            w: w.min(ws),
        })
    }

    pub fn get(&self, q: Quantity) -> PropertyResult<f64> {
        match q {
            Quantity::P => Ok(self.p),
            Quantity::T => Ok(self.t_k),
            Quantity::B => self.wet_bulb(),
            Quantity::R => self.relative_humidity(),
            Quantity::W => Ok(self.w),
            Quantity::H => Ok(moist_air_enthalpy(self.t_k, self.w)),
            Quantity::D => self.dew_point(),
        }
    }

    /// Relative humidity [0-1].
    pub fn relative_humidity(&self) -> PropertyResult<f64> {
        let pw = vapour_pressure_from_humidity_ratio(self.w, self.p);
        Ok((pw / saturation_pressure(self.t_k)?).min(1.0))
    }

    /// Dew-point temperature [K].
    pub fn dew_point(&self) -> PropertyResult<f64> {
        let pw = vapour_pressure_from_humidity_ratio(self.w, self.p);
        if pw <= 0.0 {
            return Err(PropertyError::NoSolution {
                what: "dew point of dry air",
            });
        }
        Ok(saturation_temperature(pw)?.min(self.t_k))
    }

    /// Thermodynamic wet-bulb temperature [K].
    pub fn wet_bulb(&self) -> PropertyResult<f64> {
        let ws = saturation_humidity_ratio(self.t_k, self.p)?;
        if self.w >= ws {
            return Ok(self.t_k);
        }
        bisect(
            |twb| Ok(humidity_ratio_from_wet_bulb(self.t_k, twb, self.p)? - self.w),
            T_MIN_K,
            self.t_k,
            "wet-bulb temperature",
        )
    }
}

/// Saturation vapour pressure [Pa] over ice (below 273.15 K) or liquid water.
pub fn saturation_pressure(t_k: f64) -> PropertyResult<f64> {
    validate_temperature("saturation temperature", t_k)?;
    let ln_pws = if t_k < ZERO_CELSIUS_K {
        -5.674_535_9e3 / t_k + 6.392_524_7 - 9.677_843_0e-3 * t_k + 6.221_570_1e-7 * t_k.powi(2)
            + 2.074_782_5e-9 * t_k.powi(3)
            - 9.484_024_0e-13 * t_k.powi(4)
            + 4.163_501_9 * t_k.ln()
    } else {
        -5.800_220_6e3 / t_k + 1.391_499_3 - 4.864_023_9e-2 * t_k + 4.176_476_8e-5 * t_k.powi(2)
            - 1.445_209_3e-8 * t_k.powi(3)
            + 6.545_967_3 * t_k.ln()
    };
    Ok(ln_pws.exp())
}

/// Temperature [K] at which the saturation pressure equals `pws` [Pa].
pub fn saturation_temperature(pws: f64) -> PropertyResult<f64> {
    let lo = saturation_pressure(T_MIN_K)?;
    let hi = saturation_pressure(T_MAX_K)?;
    if !(lo..=hi).contains(&pws) {
        return Err(PropertyError::OutOfRange {
            what: "vapour pressure",
            value: pws,
        });
    }
    let target = pws.ln();
    bisect(
        |t| Ok(saturation_pressure(t)?.ln() - target),
        T_MIN_K,
        T_MAX_K,
        "saturation temperature",
    )
}

/// Humidity ratio [kg/kg] from water vapour partial pressure [Pa].
pub fn humidity_ratio_from_vapour_pressure(pw: f64, p: f64) -> PropertyResult<f64> {
    if pw >= p {
        return Err(PropertyError::OutOfRange {
            what: "vapour pressure at or above total pressure",
            value: pw,
        });
    }
    Ok(EPSILON * pw / (p - pw))
}

/// Water vapour partial pressure [Pa] from humidity ratio [kg/kg].
pub fn vapour_pressure_from_humidity_ratio(w: f64, p: f64) -> f64 {
    p * w / (EPSILON + w)
}

/// Saturation humidity ratio [kg/kg] at dry-bulb `t_k`.
pub fn saturation_humidity_ratio(t_k: f64, p: f64) -> PropertyResult<f64> {
    humidity_ratio_from_vapour_pressure(saturation_pressure(t_k)?, p)
}

/// Moist-air enthalpy [J/kg dry air].
pub fn moist_air_enthalpy(t_k: f64, w: f64) -> f64 {
    let t = t_k - ZERO_CELSIUS_K;
    (1.006 * t + w * (2501.0 + 1.86 * t)) * 1000.0
}

/// Humidity ratio [kg/kg] at dry-bulb `t_k` and enthalpy `h` [J/kg].
pub fn humidity_ratio_from_enthalpy(t_k: f64, h: f64) -> f64 {
    let t = t_k - ZERO_CELSIUS_K;
    (h / 1000.0 - 1.006 * t) / (2501.0 + 1.86 * t)
}

/// Dry-bulb temperature [K] from enthalpy [J/kg] and humidity ratio [kg/kg].
pub fn dry_bulb_from_enthalpy(h: f64, w: f64) -> f64 {
    (h / 1000.0 - 2501.0 * w) / (1.006 + 1.86 * w) + ZERO_CELSIUS_K
}

/// Humidity ratio [kg/kg] from dry-bulb and wet-bulb temperatures [K].
pub fn humidity_ratio_from_wet_bulb(t_k: f64, twb_k: f64, p: f64) -> PropertyResult<f64> {
    let ws_star = saturation_humidity_ratio(twb_k, p)?;
    let t = t_k - ZERO_CELSIUS_K;
    let tw = twb_k - ZERO_CELSIUS_K;
    let w = if tw >= 0.0 {
        ((2501.0 - 2.326 * tw) * ws_star - 1.006 * (t - tw)) / (2501.0 + 1.86 * t - 4.186 * tw)
    } else {
        ((2830.0 - 0.24 * tw) * ws_star - 1.006 * (t - tw)) / (2830.0 + 1.86 * t - 2.1 * tw)
    };
    Ok(w)
}

fn validate_temperature(what: &'static str, t_k: f64) -> PropertyResult<()> {
    if !(T_MIN_K..=T_MAX_K).contains(&t_k) {
        return Err(PropertyError::OutOfRange { what, value: t_k });
    }
    Ok(())
}

fn validate_known((quantity, value): (Quantity, f64)) -> PropertyResult<()> {
    match quantity {
        Quantity::T => validate_temperature("dry-bulb temperature", value),
        Quantity::B => validate_temperature("wet-bulb temperature", value),
        Quantity::D => validate_temperature("dew-point temperature", value),
        Quantity::R => validation::validate_relative_humidity(value),
        Quantity::W => validation::validate_humidity_ratio(value),
        Quantity::H | Quantity::P => Ok(()),
    }
}

fn ensure_not_above(lower: f64, upper: f64, what: &'static str) -> PropertyResult<()> {
    if lower > upper + T_TOL_K {
        return Err(PropertyError::Supersaturated { what });
    }
    Ok(())
}

/// Highest dry-bulb temperature usable in a relative-humidity search: just
/// below the boiling point at `p`, or the correlation limit.
fn search_ceiling(p: f64) -> PropertyResult<f64> {
    if saturation_pressure(T_MAX_K)? < p {
        return Ok(T_MAX_K);
    }
    saturation_temperature(0.999 * p)
}

fn humidity_ratio_from_relative_humidity(t_k: f64, r: f64, p: f64) -> PropertyResult<f64> {
    humidity_ratio_from_vapour_pressure(r * saturation_pressure(t_k)?, p)
}

fn humidity_ratio_from_dew_point(tdp_k: f64, p: f64) -> PropertyResult<f64> {
    humidity_ratio_from_vapour_pressure(saturation_pressure(tdp_k)?, p)
}

fn dry_bulb_from_relative_humidity(r: f64, pw: f64) -> PropertyResult<f64> {
    if r <= 0.0 {
        return Err(PropertyError::NoSolution {
            what: "dry-bulb temperature at zero relative humidity",
        });
    }
    saturation_temperature(pw / r)
}

fn dry_bulb_from_wet_bulb(twb_k: f64, w: f64, p: f64) -> PropertyResult<f64> {
    bisect(
        |t| Ok(humidity_ratio_from_wet_bulb(t, twb_k, p)? - w),
        twb_k,
        T_MAX_K,
        "dry-bulb temperature from wet-bulb and humidity ratio",
    )
}

/// Reduce two sorted, validated knowns to (T [K], W [kg/kg]).
fn reduce(known: SplitKnowns) -> PropertyResult<(f64, f64)> {
    use Quantity::{B, D, H, R, T, W};

    let p = known.pressure;
    let (a, b) = (known.first.1, known.second.1);
    let state = match (known.first.0, known.second.0) {
        (T, B) => {
            ensure_not_above(b, a, "wet-bulb temperature above dry-bulb")?;
            (a, humidity_ratio_from_wet_bulb(a, b, p)?)
        }
        (T, R) => (a, humidity_ratio_from_relative_humidity(a, b, p)?),
        (T, W) => (a, b),
        (T, H) => (a, humidity_ratio_from_enthalpy(a, b)),
        (T, D) => {
            ensure_not_above(b, a, "dew point above dry-bulb")?;
            (a, humidity_ratio_from_dew_point(b, p)?)
        }
        (B, R) => {
            let (twb, r) = (a, b);
            let t = bisect(
                |t| {
                    Ok(humidity_ratio_from_relative_humidity(t, r, p)?
                        - humidity_ratio_from_wet_bulb(t, twb, p)?)
                },
                twb,
                search_ceiling(p)?,
                "dry-bulb temperature from wet-bulb and relative humidity",
            )?;
            (t, humidity_ratio_from_relative_humidity(t, r, p)?)
        }
        (B, W) => (dry_bulb_from_wet_bulb(a, b, p)?, b),
        (B, H) => {
            let (twb, h) = (a, b);
            let t = bisect(
                |t| Ok(moist_air_enthalpy(t, humidity_ratio_from_wet_bulb(t, twb, p)?) - h),
                twb,
                T_MAX_K,
                "dry-bulb temperature from wet-bulb and enthalpy",
            )?;
            (t, humidity_ratio_from_wet_bulb(t, twb, p)?)
        }
        (B, D) => {
            ensure_not_above(b, a, "dew point above wet-bulb")?;
            let w = humidity_ratio_from_dew_point(b, p)?;
            (dry_bulb_from_wet_bulb(a, w, p)?, w)
        }
        (R, W) => {
            let pw = vapour_pressure_from_humidity_ratio(b, p);
            (dry_bulb_from_relative_humidity(a, pw)?, b)
        }
        (R, H) => {
            let (r, h) = (a, b);
            let t = bisect(
                |t| Ok(moist_air_enthalpy(t, humidity_ratio_from_relative_humidity(t, r, p)?) - h),
                T_MIN_K,
                search_ceiling(p)?,
                "dry-bulb temperature from relative humidity and enthalpy",
            )?;
            (t, humidity_ratio_from_relative_humidity(t, r, p)?)
        }
        (R, D) => {
            let pw = saturation_pressure(b)?;
            (
                dry_bulb_from_relative_humidity(a, pw)?,
                humidity_ratio_from_vapour_pressure(pw, p)?,
            )
        }
        (W, H) => (dry_bulb_from_enthalpy(b, a), a),
        (W, D) => {
            return Err(PropertyError::NotIndependent {
                first: W,
                second: D,
            });
        }
        (H, D) => {
            let w = humidity_ratio_from_dew_point(b, p)?;
            (dry_bulb_from_enthalpy(a, w), w)
        }
        _ => {
            return Err(PropertyError::InvalidKnowns {
                what: "unsupported quantity pair",
            });
        }
    };
    Ok(state)
}

/// Bracketed bisection on `f` over `[lo, hi]`.
fn bisect<F>(mut f: F, mut lo: f64, mut hi: f64, what: &'static str) -> PropertyResult<f64>
where
    F: FnMut(f64) -> PropertyResult<f64>,
{
    if lo > hi {
        return Err(PropertyError::NoSolution { what });
    }
    let mut f_lo = f(lo)?;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    let f_hi = f(hi)?;
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(PropertyError::NoSolution { what });
    }

    for _ in 0..MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid)?;
        if f_mid == 0.0 || hi - lo < T_TOL_K {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_independent_pair_recovers_the_state(
            t_k in 288.15_f64..318.15,
            r in 0.2_f64..0.95,
            p in 80_000.0_f64..105_000.0,
        ) {
            let model = AshraeModel::new();
            let w = humidity_ratio_from_relative_humidity(t_k, r, p).unwrap();
            let state = MoistAir::new(p, t_k, w).unwrap();

            for (i, &a) in Quantity::STATE.iter().enumerate() {
                for &b in &Quantity::STATE[i + 1..] {
                    if (a, b) == (Quantity::W, Quantity::D) {
                        continue;
                    }
                    let known = [
                        (Quantity::P, p),
                        (a, state.get(a).unwrap()),
                        (b, state.get(b).unwrap()),
                    ];
                    let solved = model
                        .moist_air(&known)
                        .map_err(|e| TestCaseError::fail(format!("{a}/{b}: {e}")))?;
                    prop_assert!(
                        (solved.t_k - t_k).abs() < 1e-4,
                        "{}/{}: T {} vs {}", a, b, solved.t_k, t_k
                    );
                    prop_assert!(
                        (solved.w - w).abs() < 1e-7,
                        "{}/{}: W {} vs {}", a, b, solved.w, w
                    );
                }
            }
        }
    }
}
