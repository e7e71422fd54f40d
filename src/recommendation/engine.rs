//! Core RecommendationEngine: ranks the intervention table against one
//! snapshot and risk assessment

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::config::RecommendationConfig;
use crate::types::{
    HealthMetricSnapshot, RiskAssessment, RiskCategory, ScoredIntervention, SeverityTier,
};

use super::catalog::InterventionTable;
use super::scoring::{score_intervention, score_maintenance};

/// Why a recommendation set looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// At least one risk category present; interventions ranked against it
    Targeted,
    /// No risk present; baseline maintenance protocol only
    Maintenance,
}

impl std::fmt::Display for RecommendationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationMode::Targeted => write!(f, "TARGETED"),
            RecommendationMode::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub mode: RecommendationMode,
    /// Sorted by descending score, then category priority, then name
    pub interventions: Vec<ScoredIntervention>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interventions.iter().map(|s| s.intervention.name.as_str())
    }
}

/// Stateless ranking engine over an immutable intervention table.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    table: InterventionTable,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(table: InterventionTable, config: RecommendationConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &InterventionTable {
        &self.table
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Rank interventions for one snapshot and its risk assessment.
    ///
    /// 1. Empty risk → maintenance interventions only
    /// 2. Score and drop irrelevant candidates
    /// 3. Sort, truncate to `top_k`
    /// 4. Append the best candidate for each uncovered high-severity category
    pub fn recommend(
        &self,
        snapshot: &HealthMetricSnapshot,
        risk: &RiskAssessment,
    ) -> Recommendation {
        if risk.is_empty() {
            return self.maintenance(snapshot);
        }

        let mut candidates: Vec<ScoredIntervention> = self
            .table
            .interventions
            .iter()
            .filter_map(|i| score_intervention(i, snapshot, risk, &self.config))
            .collect();
        sort_ranked(&mut candidates);

        let top_k = self.config.top_k.max(1);
        let mut selected: Vec<ScoredIntervention> =
            candidates.iter().take(top_k).cloned().collect();

        // High-severity coverage: candidates are already in rank order, so the
        // first match is the best-scoring one.
        for category in risk.at_or_above(SeverityTier::High) {
            if is_covered(&selected, category) {
                continue;
            }
            if let Some(best) = candidates
                .iter()
                .find(|c| c.intervention.addresses(category))
            {
                debug!(
                    category = %category,
                    intervention = %best.intervention.name,
                    "Adding intervention for uncovered high-severity risk"
                );
                selected.push(best.clone());
            } else {
                warn!(
                    category = %category,
                    table = %self.table.version,
                    "High-severity risk has no candidate intervention"
                );
            }
        }
        sort_ranked(&mut selected);

        debug!(
            day = snapshot.day,
            candidates = candidates.len(),
            selected = selected.len(),
            "Recommendations ranked"
        );

        Recommendation {
            mode: RecommendationMode::Targeted,
            interventions: selected,
        }
    }

    /// Baseline protocol when nothing is at risk. Not an error.
    fn maintenance(&self, snapshot: &HealthMetricSnapshot) -> Recommendation {
        let mut interventions: Vec<ScoredIntervention> = self
            .table
            .interventions
            .iter()
            .filter(|i| i.maintenance)
            .map(|i| score_maintenance(i, &self.config))
            .collect();
        sort_ranked(&mut interventions);
        interventions.truncate(self.config.top_k.max(1));

        debug!(day = snapshot.day, count = interventions.len(), "No risk present, maintenance protocol");

        Recommendation {
            mode: RecommendationMode::Maintenance,
            interventions,
        }
    }
}

fn is_covered(selected: &[ScoredIntervention], category: RiskCategory) -> bool {
    selected.iter().any(|s| s.intervention.addresses(category))
}

/// Descending score, then category priority, then name.
pub fn sort_ranked(items: &mut [ScoredIntervention]) {
    items.sort_by(ranking_order);
}

pub fn ranking_order(a: &ScoredIntervention, b: &ScoredIntervention) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.intervention.category.cmp(&b.intervention.category))
        .then_with(|| a.intervention.name.cmp(&b.intervention.name))
}
