//! AHSE: Astronaut Health Simulation Engine
//!
//! Deterministic health-trajectory projection and countermeasure planning for
//! long-duration crewed missions.
//!
//! ## Architecture
//!
//! - **Projection**: closed-form decay curves per physiological metric, sampled
//!   over the mission, with a risk assessment per sample
//! - **Recommendation**: composite scoring of a static intervention table
//!   against the final snapshot and risk, plus a phased mission plan
//! - **Pipeline**: validation → projection → recommendation → planning, single
//!   astronaut or whole crew in parallel

pub mod config;
pub mod error;
pub mod pipeline;
pub mod projection;
pub mod recommendation;
pub mod types;

// Re-export simulation configuration
pub use config::{ConfigError, SimConfig};

// Re-export errors
pub use error::{ComputationError, SimulationError, ValidationError};

// Re-export commonly used types
pub use types::{
    AstronautProfile, BaselineHealth, CountermeasureRegimen, Destination, HealthMetric,
    HealthMetricSnapshot, HealthStatus, Intervention, InterventionCategory, MissionParameters,
    MissionPhase, MissionPlan, MissionSpec, NutritionRegimen, RiskAssessment, RiskCategory,
    ScoredIntervention, SeverityTier, Sex,
};

// Re-export pipeline stages
pub use pipeline::scenario::{Scenario, ScenarioError};
pub use pipeline::{run_crew, run_pipeline, PipelineContext, PipelineReport};
pub use projection::{project, ProjectionRun, TrajectoryPoint};
pub use recommendation::{
    plan_mission, InterventionTable, Recommendation, RecommendationEngine, RecommendationMode,
};
