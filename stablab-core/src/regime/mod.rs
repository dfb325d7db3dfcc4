//! Regime classifiers — one closed enumeration per domain.
//!
//! Each classifier is a pure total function over current inputs: level-
//! triggered, no hysteresis, no dependency on the previous label. The three
//! state spaces are deliberately independent types; a shared "regime" enum
//! would invite cross-domain misclassification.

pub mod metals;
pub mod signal_light;
pub mod stress;

pub use metals::{MetalsInputs, MetalsRegime, MetalsThresholds};
pub use signal_light::{SignalLight, SignalLightThresholds};
pub use stress::{StressRegime, StressThresholds};
