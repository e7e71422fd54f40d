//! Risk categories, severity tiers and per-sample risk assessments

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::HealthMetric;

/// Fixed tier boundaries. Not configurable, not inferred.
pub mod risk_thresholds {
    /// Probabilities below this are LOW
    pub const MEDIUM_MIN: f64 = 0.3;
    /// Probabilities above this are HIGH; MEDIUM covers `MEDIUM_MIN..=HIGH_ABOVE`
    pub const HIGH_ABOVE: f64 = 0.6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    MuscleAtrophy,
    BoneFracture,
    CardiovascularEvent,
    Cancer,
    MentalHealth,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::MuscleAtrophy,
        RiskCategory::BoneFracture,
        RiskCategory::CardiovascularEvent,
        RiskCategory::Cancer,
        RiskCategory::MentalHealth,
    ];

    /// Metrics feeding this category and their weights (weights sum to 1).
    pub fn contributors(self) -> &'static [(HealthMetric, f64)] {
        match self {
            RiskCategory::MuscleAtrophy => &[(HealthMetric::MuscleMass, 1.0)],
            RiskCategory::BoneFracture => &[
                (HealthMetric::BoneDensity, 0.8),
                (HealthMetric::MuscleMass, 0.2),
            ],
            RiskCategory::CardiovascularEvent => &[
                (HealthMetric::CardiovascularFitness, 0.7),
                (HealthMetric::StressLevel, 0.3),
            ],
            RiskCategory::Cancer => &[
                (HealthMetric::RadiationDnaDamage, 0.85),
                (HealthMetric::ImmuneFunction, 0.15),
            ],
            RiskCategory::MentalHealth => &[
                (HealthMetric::CognitivePerformance, 0.35),
                (HealthMetric::StressLevel, 0.35),
                (HealthMetric::SleepQuality, 0.3),
            ],
        }
    }

    pub fn is_fed_by(self, metric: HealthMetric) -> bool {
        self.contributors().iter().any(|(m, _)| *m == metric)
    }

    /// Categories a metric contributes to.
    pub fn fed_by(metric: HealthMetric) -> impl Iterator<Item = RiskCategory> {
        Self::ALL.into_iter().filter(move |c| c.is_fed_by(metric))
    }

    pub fn key(self) -> &'static str {
        match self {
            RiskCategory::MuscleAtrophy => "muscle_atrophy",
            RiskCategory::BoneFracture => "bone_fracture",
            RiskCategory::CardiovascularEvent => "cardiovascular_event",
            RiskCategory::Cancer => "cancer",
            RiskCategory::MentalHealth => "mental_health",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub fn from_probability(p: f64) -> Self {
        if p > risk_thresholds::HIGH_ABOVE {
            SeverityTier::High
        } else if p >= risk_thresholds::MEDIUM_MIN {
            SeverityTier::Medium
        } else {
            SeverityTier::Low
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityTier::Low => write!(f, "LOW"),
            SeverityTier::Medium => write!(f, "MEDIUM"),
            SeverityTier::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    /// Probability in [0, 1]
    pub probability: f64,
    pub tier: SeverityTier,
}

impl RiskEntry {
    pub fn new(probability: f64) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        Self {
            probability,
            tier: SeverityTier::from_probability(probability),
        }
    }
}

/// Risk per category at one sample. Categories with zero probability are
/// absent, so a fresh (day 0) assessment is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub day: u32,
    pub categories: BTreeMap<RiskCategory, RiskEntry>,
}

impl RiskAssessment {
    pub fn empty(day: u32) -> Self {
        Self {
            day,
            categories: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, category: RiskCategory, probability: f64) {
        if probability > 0.0 {
            self.categories.insert(category, RiskEntry::new(probability));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, category: RiskCategory) -> Option<&RiskEntry> {
        self.categories.get(&category)
    }

    pub fn probability(&self, category: RiskCategory) -> f64 {
        self.get(category).map_or(0.0, |e| e.probability)
    }

    pub fn tier(&self, category: RiskCategory) -> Option<SeverityTier> {
        self.get(category).map(|e| e.tier)
    }

    /// Highest tier present, `None` when empty.
    pub fn max_tier(&self) -> Option<SeverityTier> {
        self.categories.values().map(|e| e.tier).max()
    }

    /// Categories at or above `tier`, in canonical order.
    pub fn at_or_above(&self, tier: SeverityTier) -> Vec<RiskCategory> {
        self.categories
            .iter()
            .filter(|(_, e)| e.tier >= tier)
            .map(|(c, _)| *c)
            .collect()
    }
}
