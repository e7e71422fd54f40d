//! Shared data structures for the health projection pipeline
//!
//! - AstronautProfile, MissionParameters (caller inputs, read-only)
//! - HealthMetricSnapshot, RiskAssessment (projection outputs)
//! - Intervention, ScoredIntervention, MissionPlan (recommendation outputs)

mod metrics;
mod profile;
mod mission;
mod risk;
mod intervention;

pub use metrics::*;
pub use profile::*;
pub use mission::*;
pub use risk::*;
pub use intervention::*;
