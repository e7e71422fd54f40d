//! Risk derivation from metric deterioration
//!
//! Each category probability is the weighted mean of the deterioration
//! fractions of the metrics feeding it. Fractions are measured from the
//! run's baseline, so a snapshot equal to baseline carries no risk.

use crate::types::{HealthMetricSnapshot, RiskAssessment, RiskCategory};

/// Probability for one category at `snapshot`, relative to `baseline`.
pub fn category_probability(
    category: RiskCategory,
    baseline: &HealthMetricSnapshot,
    snapshot: &HealthMetricSnapshot,
) -> f64 {
    category
        .contributors()
        .iter()
        .map(|(metric, weight)| {
            weight * metric.deterioration_fraction(baseline.value(*metric), snapshot.value(*metric))
        })
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

/// Full assessment for one sample. Zero-probability categories are omitted.
pub fn assess_risk(
    baseline: &HealthMetricSnapshot,
    snapshot: &HealthMetricSnapshot,
) -> RiskAssessment {
    let mut risk = RiskAssessment::empty(snapshot.day);
    for category in RiskCategory::ALL {
        risk.insert(category, category_probability(category, baseline, snapshot));
    }
    risk
}
