//! Error types for the projection and recommendation pipeline
//!
//! - `ValidationError`: bad caller input, raised before any computation starts
//! - `ComputationError`: an internal invariant broke (formula or config bug)
//! - `SimulationError`: what `project` and the pipeline return

use thiserror::Error;

use crate::types::HealthMetric;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} = {value} is outside the plausible range {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    #[error("baseline {metric} = {value} leaves no headroom before its harmful limit {limit}")]
    BaselineAtHarmfulLimit {
        metric: HealthMetric,
        value: f64,
        limit: f64,
    },

    #[error("mission duration {days} days exceeds the configured maximum of {max} days")]
    DurationTooLong { days: u32, max: u32 },

    #[error("radiation exposure {value} mSv/day is not plausible for {destination} ({min}..={max})")]
    ImplausibleRadiation {
        destination: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("{metric} = {value} left its valid range {min}..={max} on day {day}")]
    MetricOutOfRange {
        metric: HealthMetric,
        day: u32,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{metric} is not finite on day {day}")]
    NonFiniteMetric { metric: HealthMetric, day: u32 },

    #[error("snapshot days not strictly increasing: day {current} follows day {previous}")]
    NonIncreasingDays { previous: u32, current: u32 },

    #[error("{metric} improved from {previous} to {current} on day {day}")]
    MetricImproved {
        metric: HealthMetric,
        day: u32,
        previous: f64,
        current: f64,
    },

    #[error("projection produced no snapshots")]
    EmptyTrajectory,

    #[error("risk for {category} decreased from {previous:.4} to {current:.4} on day {day}")]
    RiskDecreased {
        category: String,
        day: u32,
        previous: f64,
        current: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("computation invariant violated: {0}")]
    Computation(#[from] ComputationError),
}

impl SimulationError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SimulationError::Validation(_))
    }
}
