//! Processing Pipeline Module
//!
//! ```text
//! STAGE 1: Validation      (profile + mission, fail before any work)
//! STAGE 2: Projection      (decay curves sampled every N days, risk per sample)
//! STAGE 3: Recommendation  (final snapshot + final risk → ranked interventions)
//! STAGE 4: Planning        (optional, phases from the full risk trajectory)
//! STAGE 5: Summary         (health change, mission-level countermeasures)
//! ```
//!
//! Every stage is a pure function of its inputs. Crew batches run each
//! astronaut independently on the rayon pool.

pub mod report;
pub mod scenario;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::error::{ComputationError, SimulationError};
use crate::projection::{project, ProjectionRun};
use crate::recommendation::{plan_mission, InterventionTable, Recommendation, RecommendationEngine};
use crate::types::{
    AstronautProfile, HealthMetric, HealthMetricSnapshot, HealthStatus, MissionParameters,
    MissionPlan, RiskAssessment, RiskCategory, SeverityTier,
};

/// Immutable inputs shared by every run: model constants and the engine
/// holding the intervention table.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: SimConfig,
    pub engine: RecommendationEngine,
    pub include_plan: bool,
}

impl PipelineContext {
    pub fn new(config: SimConfig, table: InterventionTable) -> Self {
        let engine = RecommendationEngine::new(table, config.recommendation.clone());
        Self {
            config,
            engine,
            include_plan: true,
        }
    }

    pub fn with_plan(mut self, include_plan: bool) -> Self {
        self.include_plan = include_plan;
        self
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new(SimConfig::default(), InterventionTable::builtin())
    }
}

/// Change of one metric between baseline and the final sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChange {
    pub metric: HealthMetric,
    pub baseline: f64,
    pub final_value: f64,
    pub change: f64,
    /// Relative change in percent; `None` when the baseline is zero
    pub percent_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub baseline_score: f64,
    pub final_score: f64,
    pub baseline_status: HealthStatus,
    pub final_status: HealthStatus,
    pub changes: Vec<MetricChange>,
}

impl HealthSummary {
    pub fn change(&self, metric: HealthMetric) -> Option<&MetricChange> {
        self.changes.iter().find(|c| c.metric == metric)
    }
}

/// Mission-wide directive for a medium or high final risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionCountermeasure {
    pub category: RiskCategory,
    pub tier: SeverityTier,
    pub directive: String,
}

/// Everything one pipeline invocation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub projection: ProjectionRun,
    pub final_risk: RiskAssessment,
    pub summary: HealthSummary,
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<MissionPlan>,
    pub countermeasures: Vec<MissionCountermeasure>,
}

/// Project, recommend and (optionally) plan for one astronaut.
pub fn run_pipeline(
    profile: &AstronautProfile,
    mission: &MissionParameters,
    ctx: &PipelineContext,
) -> Result<PipelineReport, SimulationError> {
    let projection = project(profile, mission, &ctx.config)?;
    let last = projection
        .final_point()
        .ok_or(ComputationError::EmptyTrajectory)?;

    let recommendation = ctx.engine.recommend(&last.snapshot, &last.risk);
    let plan = ctx
        .include_plan
        .then(|| plan_mission(&recommendation, &projection));

    let summary = summarize(&projection.baseline, &last.snapshot);
    let countermeasures = mission_countermeasures(&last.risk);
    let final_risk = last.risk.clone();

    info!(
        astronaut = %profile.name,
        mode = %recommendation.mode,
        interventions = recommendation.interventions.len(),
        countermeasures = countermeasures.len(),
        final_status = %summary.final_status,
        "Pipeline complete"
    );

    Ok(PipelineReport {
        projection,
        final_risk,
        summary,
        recommendation,
        plan,
        countermeasures,
    })
}

/// Run the pipeline for each crew member in parallel. Output order matches
/// input order; one astronaut failing does not affect the others.
pub fn run_crew(
    crew: &[AstronautProfile],
    mission: &MissionParameters,
    ctx: &PipelineContext,
) -> Vec<Result<PipelineReport, SimulationError>> {
    let results: Vec<Result<PipelineReport, SimulationError>> = crew
        .par_iter()
        .map(|profile| run_pipeline(profile, mission, ctx))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(crew = crew.len(), failed, "Crew run completed with failures");
    } else {
        info!(crew = crew.len(), "Crew run complete");
    }
    results
}

fn summarize(baseline: &HealthMetricSnapshot, last: &HealthMetricSnapshot) -> HealthSummary {
    let changes = HealthMetric::ALL
        .into_iter()
        .map(|metric| {
            let base = baseline.value(metric);
            let final_value = last.value(metric);
            let change = final_value - base;
            let percent_change = (base.abs() > f64::EPSILON).then(|| change / base.abs() * 100.0);
            MetricChange {
                metric,
                baseline: base,
                final_value,
                change,
                percent_change,
            }
        })
        .collect();

    HealthSummary {
        baseline_score: baseline.overall_health_score(),
        final_score: last.overall_health_score(),
        baseline_status: baseline.health_status(),
        final_status: last.health_status(),
        changes,
    }
}

/// One directive per medium or high final risk category.
pub fn mission_countermeasures(risk: &RiskAssessment) -> Vec<MissionCountermeasure> {
    risk.categories
        .iter()
        .filter(|(_, entry)| entry.tier >= SeverityTier::Medium)
        .map(|(category, entry)| MissionCountermeasure {
            category: *category,
            tier: entry.tier,
            directive: directive_for(*category, entry.tier),
        })
        .collect()
}

fn directive_for(category: RiskCategory, tier: SeverityTier) -> String {
    let base = match category {
        RiskCategory::MuscleAtrophy => {
            "Increase resistance exercise volume and protein intake to limit muscle atrophy"
        }
        RiskCategory::BoneFracture => {
            "Add impact-loading exercise and schedule bone density checkpoints"
        }
        RiskCategory::CardiovascularEvent => {
            "Schedule cardiovascular monitoring alongside aerobic conditioning blocks"
        }
        RiskCategory::Cancer => {
            "Enhance radiation shielding and restrict EVA during solar particle events"
        }
        RiskCategory::MentalHealth => {
            "Provide behavioral health support, crew autonomy and protected sleep periods"
        }
    };
    match tier {
        SeverityTier::High => format!("{base} (mandatory before departure)"),
        _ => base.to_string(),
    }
}
