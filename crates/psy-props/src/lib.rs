//! psy-props: humid-air property evaluation for psychroflow.
//!
//! Provides:
//! - Quantity codes for the moist-air state variables (P, T, B, R, W, H, D)
//! - The `PropertyEvaluator` trait: one target quantity from pressure plus two knowns
//! - `AshraeModel`, a pure-Rust evaluator built on the ASHRAE Fundamentals relations
//! - `CoolPropModel` (feature `coolprop`), forwarding to CoolProp's HAPropsSI via `rfluids`
//!
//! # Architecture
//!
//! The rest of psychroflow only sees `PropertyEvaluator`. Backends are picked at
//! runtime by name through [`model_by_name`], so the engine never links against a
//! particular thermodynamic library.
//!
//! # Example
//!
//! ```
//! use psy_props::{AshraeModel, PropertyEvaluator, Quantity};
//!
//! let model = AshraeModel::new();
//! let known = [
//!     (Quantity::P, 101_325.0),
//!     (Quantity::T, 298.15),
//!     (Quantity::R, 0.6),
//! ];
//! let w = model.evaluate(Quantity::W, &known).unwrap();
//! println!("Humidity ratio: {:.5} kg/kg", w);
//! ```

pub mod ashrae;
#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod evaluator;
pub mod quantity;

// Re-exports for ergonomics
pub use ashrae::AshraeModel;
#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropModel;
pub use error::{PropertyError, PropertyResult};
pub use evaluator::{KnownQuantities, PropertyEvaluator, available_backends, model_by_name};
pub use quantity::Quantity;
