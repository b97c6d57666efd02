//! ASHRAE model integration tests.
//!
//! Reference values are from the ASHRAE Handbook - Fundamentals psychrometric
//! tables at standard atmospheric pressure. Tolerances are loose enough to
//! absorb table rounding but tight enough to catch a wrong branch or unit.

use psy_props::{AshraeModel, PropertyError, PropertyEvaluator, Quantity, model_by_name};

const P_ATM: f64 = 101_325.0;

fn evaluate(
    model: &dyn PropertyEvaluator,
    target: Quantity,
    a: (Quantity, f64),
    b: (Quantity, f64),
) -> f64 {
    model
        .evaluate(target, &[(Quantity::P, P_ATM), a, b])
        .unwrap_or_else(|e| panic!("{target} from {a:?}, {b:?} failed: {e}"))
}

#[test]
fn saturation_humidity_ratio_table() {
    let model = AshraeModel::new();
    // (t °C, Ws g/kg)
    let table = [(0.0, 3.789), (10.0, 7.659), (20.0, 14.758), (30.0, 27.329)];
    for (t_c, ws_ref) in table {
        let ws = evaluate(&model, Quantity::W, (Quantity::T, t_c + 273.15), (Quantity::R, 1.0));
        // Table values include the enhancement factor; the ideal-mixture relation runs ~0.5% low.
        assert!(
            (ws * 1000.0 - ws_ref).abs() < 0.01 * ws_ref,
            "Ws at {t_c} °C = {} g/kg, expected {ws_ref}",
            ws * 1000.0
        );
    }
}

#[test]
fn dry_air_enthalpy_is_sensible_heat_only() {
    let model = AshraeModel::new();
    let h = evaluate(&model, Quantity::H, (Quantity::T, 303.15), (Quantity::W, 0.0));
    assert!((h - 30_180.0).abs() < 1.0, "h = {h}");
}

#[test]
fn temperature_ordering_below_saturation() {
    let model = AshraeModel::new();
    for (t, r) in [(283.15, 0.3), (298.15, 0.6), (308.15, 0.9), (318.15, 0.15)] {
        let twb = evaluate(&model, Quantity::B, (Quantity::T, t), (Quantity::R, r));
        let tdp = evaluate(&model, Quantity::D, (Quantity::T, t), (Quantity::R, r));
        assert!(tdp < twb, "T={t} R={r}: tdp {tdp} !< twb {twb}");
        assert!(twb < t, "T={t} R={r}: twb {twb} !< T");
    }
}

#[test]
fn wet_bulb_and_enthalpy_inputs_resolve() {
    let model = AshraeModel::new();
    let t = evaluate(&model, Quantity::T, (Quantity::B, 293.15), (Quantity::R, 0.5));
    assert!(t > 293.15 && t < 310.0, "T = {t}");

    let r = evaluate(&model, Quantity::R, (Quantity::W, 0.010), (Quantity::H, 50_000.0));
    assert!(r > 0.0 && r < 1.0, "R = {r}");
}

#[test]
fn backend_by_name_matches_direct_model() {
    let named = model_by_name("ashrae").unwrap();
    let direct = AshraeModel::new();
    let a = evaluate(named.as_ref(), Quantity::W, (Quantity::T, 295.0), (Quantity::R, 0.45));
    let b = evaluate(&direct, Quantity::W, (Quantity::T, 295.0), (Quantity::R, 0.45));
    assert_eq!(a, b);
}

#[test]
fn enthalpy_too_high_for_saturation_fails() {
    let model = AshraeModel::new();
    let err = model
        .evaluate(
            Quantity::T,
            &[(Quantity::P, P_ATM), (Quantity::T, 293.15), (Quantity::H, 200_000.0)],
        )
        .unwrap_err();
    assert!(matches!(err, PropertyError::Supersaturated { .. }));
}
