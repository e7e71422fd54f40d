//! Interventions, scored recommendations and phased mission plans

use serde::{Deserialize, Serialize};

use super::{HealthMetric, RiskCategory};

/// Intervention category. Declaration order is the tie-break priority
/// (exercise first, behavioral last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionCategory {
    Exercise,
    Nutrition,
    Pharmacological,
    Shielding,
    Behavioral,
}

impl InterventionCategory {
    /// Fixed weight used in the composite score (exercise 1.0 .. behavioral 0.2).
    pub fn priority_weight(self) -> f64 {
        match self {
            InterventionCategory::Exercise => 1.0,
            InterventionCategory::Nutrition => 0.8,
            InterventionCategory::Pharmacological => 0.6,
            InterventionCategory::Shielding => 0.4,
            InterventionCategory::Behavioral => 0.2,
        }
    }
}

impl std::fmt::Display for InterventionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterventionCategory::Exercise => write!(f, "exercise"),
            InterventionCategory::Nutrition => write!(f, "nutrition"),
            InterventionCategory::Pharmacological => write!(f, "pharmacological"),
            InterventionCategory::Shielding => write!(f, "shielding"),
            InterventionCategory::Behavioral => write!(f, "behavioral"),
        }
    }
}

/// Mission phase an intervention applies to, or a plan phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionPhase {
    Early,
    Mid,
    Late,
    /// Applicable throughout the mission
    #[default]
    Any,
}

impl std::fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionPhase::Early => write!(f, "Early Mission"),
            MissionPhase::Mid => write!(f, "Mid Mission"),
            MissionPhase::Late => write!(f, "Late Mission"),
            MissionPhase::Any => write!(f, "Any Phase"),
        }
    }
}

/// One row of the static intervention reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub targets: Vec<HealthMetric>,
    /// Estimated benefit in [0, 1]
    pub benefit: f64,
    pub category: InterventionCategory,
    #[serde(default)]
    pub phase: MissionPhase,
    /// Part of the baseline protocol recommended when no risk is present
    #[serde(default)]
    pub maintenance: bool,
}

impl Intervention {
    pub fn targets_metric(&self, metric: HealthMetric) -> bool {
        self.targets.contains(&metric)
    }

    /// Whether any target metric feeds `category`.
    pub fn addresses(&self, category: RiskCategory) -> bool {
        self.targets.iter().any(|m| category.is_fed_by(*m))
    }

    /// Risk categories fed by at least one target metric, canonical order.
    pub fn addressed_categories(&self) -> Vec<RiskCategory> {
        RiskCategory::ALL
            .into_iter()
            .filter(|c| self.addresses(*c))
            .collect()
    }
}

/// Breakdown of an intervention's composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// benefit x deficit of the targeted metrics (0-1)
    pub benefit: f64,
    /// Highest tier score among addressed risk categories (0-1)
    pub severity: f64,
    /// Fixed category weight (0-1)
    pub category: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredIntervention {
    pub intervention: Intervention,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Risk categories this intervention addresses that are currently present
    pub addressed_risks: Vec<RiskCategory>,
}

/// One phase of a mission plan with an inclusive day range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub phase: MissionPhase,
    pub start_day: u32,
    pub end_day: u32,
    /// Intervention names in recommendation order
    pub interventions: Vec<String>,
}

impl PlanPhase {
    pub fn contains_day(&self, day: u32) -> bool {
        day >= self.start_day && day <= self.end_day
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub phases: Vec<PlanPhase>,
}

impl MissionPlan {
    pub fn phase(&self, phase: MissionPhase) -> Option<&PlanPhase> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Phase an intervention was scheduled into, by name.
    pub fn phase_of(&self, intervention: &str) -> Option<MissionPhase> {
        self.phases
            .iter()
            .find(|p| p.interventions.iter().any(|n| n == intervention))
            .map(|p| p.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_priority_order() {
        assert!(InterventionCategory::Exercise < InterventionCategory::Nutrition);
        assert!(InterventionCategory::Nutrition < InterventionCategory::Pharmacological);
        assert!(InterventionCategory::Pharmacological < InterventionCategory::Shielding);
        assert!(InterventionCategory::Shielding < InterventionCategory::Behavioral);
        assert!(
            InterventionCategory::Exercise.priority_weight()
                > InterventionCategory::Behavioral.priority_weight()
        );
    }

    #[test]
    fn test_addressed_categories() {
        let i = Intervention {
            name: "Resistance Training".into(),
            description: String::new(),
            targets: vec![HealthMetric::MuscleMass, HealthMetric::BoneDensity],
            benefit: 0.85,
            category: InterventionCategory::Exercise,
            phase: MissionPhase::Any,
            maintenance: true,
        };
        assert_eq!(
            i.addressed_categories(),
            vec![RiskCategory::MuscleAtrophy, RiskCategory::BoneFracture]
        );
        assert!(!i.addresses(RiskCategory::Cancer));
    }
}
