//! Recommendation Engine
//!
//! Ranks a static intervention table against a health snapshot and its risk
//! assessment, and schedules the result into a phased mission plan. Entirely
//! algorithmic, deterministic for identical inputs.

mod catalog;
mod engine;
pub mod planner;
pub mod scoring;

pub use catalog::{CatalogError, InterventionTable, BUILTIN_TABLE_VERSION};
pub use engine::{ranking_order, Recommendation, RecommendationEngine, RecommendationMode};
pub use planner::plan_mission;
