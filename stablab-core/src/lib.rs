//! StabLab Core — normalization, aggregation, classification, projection.
//!
//! This crate contains the scoring pipeline:
//! - Domain types (samples, series, scores, weights, composite results)
//! - Indicator normalization (linear clamp, rolling z-score with momentum blend)
//! - Weight redistribution onto the active component set
//! - Composite aggregation with completeness gating
//! - Regime classifiers (traffic light, metals, stress — one enum per domain)
//! - Sparkline smoothing and categorical quantization
//! - Multi-horizon projection engine with ranking and uncertainty cones
//!
//! Everything is a pure function of the supplied snapshot: no I/O, no
//! retained state, identical inputs always yield identical outputs.

pub mod composite;
pub mod domain;
pub mod normalize;
pub mod projection;
pub mod regime;
pub mod smoothing;
pub mod weights;
