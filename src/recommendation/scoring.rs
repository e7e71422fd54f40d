//! 3-factor composite scoring for candidate interventions

use crate::config::RecommendationConfig;
use crate::types::{
    HealthMetricSnapshot, Intervention, RiskAssessment, ScoreBreakdown, ScoredIntervention,
    SeverityTier,
};

/// Score an intervention against the current snapshot and risk.
///
/// Weights (defaults): targeted deficit 50%, risk severity 35%, category
/// priority 15%. Returns `None` when the intervention addresses neither a
/// deteriorated metric nor a present risk.
pub fn score_intervention(
    intervention: &Intervention,
    snapshot: &HealthMetricSnapshot,
    risk: &RiskAssessment,
    weights: &RecommendationConfig,
) -> Option<ScoredIntervention> {
    let benefit = score_benefit(intervention, snapshot);
    let severity = score_severity(intervention, risk);
    if benefit <= 0.0 && severity <= 0.0 {
        return None;
    }
    let category = intervention.category.priority_weight();

    let score = weights.benefit_weight * benefit
        + weights.severity_weight * severity
        + weights.category_weight * category;

    let addressed_risks = intervention
        .addressed_categories()
        .into_iter()
        .filter(|c| risk.get(*c).is_some())
        .collect();

    Some(ScoredIntervention {
        intervention: intervention.clone(),
        score,
        breakdown: ScoreBreakdown {
            benefit,
            severity,
            category,
        },
        addressed_risks,
    })
}

/// Score for the maintenance protocol, used when no risk is present.
///
/// There is no deficit or severity to weigh, so the intervention's own
/// benefit stands in for the benefit term.
pub fn score_maintenance(
    intervention: &Intervention,
    weights: &RecommendationConfig,
) -> ScoredIntervention {
    let benefit = intervention.benefit.clamp(0.0, 1.0);
    let category = intervention.category.priority_weight();
    ScoredIntervention {
        intervention: intervention.clone(),
        score: weights.benefit_weight * benefit + weights.category_weight * category,
        breakdown: ScoreBreakdown {
            benefit,
            severity: 0.0,
            category,
        },
        addressed_risks: Vec::new(),
    }
}

/// Benefit × summed deficit of the targeted metrics, capped at 1.
/// Larger deficits → more to gain from the intervention.
fn score_benefit(intervention: &Intervention, snapshot: &HealthMetricSnapshot) -> f64 {
    let deficit: f64 = intervention
        .targets
        .iter()
        .map(|m| snapshot.deficit(*m))
        .sum();
    (intervention.benefit * deficit.min(1.0)).clamp(0.0, 1.0)
}

/// Highest tier among risk categories the intervention addresses.
fn score_severity(intervention: &Intervention, risk: &RiskAssessment) -> f64 {
    intervention
        .addressed_categories()
        .into_iter()
        .filter_map(|c| risk.tier(c))
        .map(tier_score)
        .fold(0.0, f64::max)
}

pub fn tier_score(tier: SeverityTier) -> f64 {
    match tier {
        SeverityTier::High => 1.0,
        SeverityTier::Medium => 0.6,
        SeverityTier::Low => 0.2,
    }
}
