//! Domain types for StabLab

pub mod composite;
pub mod sample;
pub mod score;
pub mod weight;

pub use composite::{CompositeResult, InsufficientReason, StabilityValue};
pub use sample::{MetricSample, MetricSeries};
pub use score::{Direction, NormalizedScore, ScoreStatus};
pub use weight::ComponentWeight;

/// Metric identifier type alias
pub type MetricId = String;

/// Projection entity identifier type alias
pub type EntityId = String;
