//! Health metrics: names, valid ranges, harm direction, snapshots and the
//! overall health score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The eight projected physiological metrics.
///
/// Variant order is the canonical iteration order (and the `BTreeMap` key
/// order inside a snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthMetric {
    /// Lean muscle mass (kg)
    MuscleMass,
    /// Bone mineral density (T-score)
    BoneDensity,
    /// Cardiovascular fitness index (0-1)
    CardiovascularFitness,
    /// Immune function index (0-1)
    ImmuneFunction,
    /// Cognitive performance index (0-1)
    CognitivePerformance,
    /// Accumulated radiation-induced DNA damage index (0-1)
    RadiationDnaDamage,
    /// Psychological stress index (0-1)
    StressLevel,
    /// Sleep quality index (0-1)
    SleepQuality,
}

/// Which way along its range a metric gets worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmDirection {
    HigherIsWorse,
    LowerIsWorse,
}

/// Closed interval a metric value must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl HealthMetric {
    pub const ALL: [HealthMetric; 8] = [
        HealthMetric::MuscleMass,
        HealthMetric::BoneDensity,
        HealthMetric::CardiovascularFitness,
        HealthMetric::ImmuneFunction,
        HealthMetric::CognitivePerformance,
        HealthMetric::RadiationDnaDamage,
        HealthMetric::StressLevel,
        HealthMetric::SleepQuality,
    ];

    /// Snake-case key used in serialized snapshots and config tables.
    pub fn key(self) -> &'static str {
        match self {
            HealthMetric::MuscleMass => "muscle_mass",
            HealthMetric::BoneDensity => "bone_density",
            HealthMetric::CardiovascularFitness => "cardiovascular_fitness",
            HealthMetric::ImmuneFunction => "immune_function",
            HealthMetric::CognitivePerformance => "cognitive_performance",
            HealthMetric::RadiationDnaDamage => "radiation_dna_damage",
            HealthMetric::StressLevel => "stress_level",
            HealthMetric::SleepQuality => "sleep_quality",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            HealthMetric::MuscleMass => "kg",
            HealthMetric::BoneDensity => "T",
            _ => "",
        }
    }

    pub fn valid_range(self) -> MetricRange {
        match self {
            HealthMetric::MuscleMass => MetricRange::new(20.0, 150.0),
            HealthMetric::BoneDensity => MetricRange::new(-5.0, 3.0),
            _ => MetricRange::new(0.0, 1.0),
        }
    }

    pub fn harm_direction(self) -> HarmDirection {
        match self {
            HealthMetric::RadiationDnaDamage | HealthMetric::StressLevel => {
                HarmDirection::HigherIsWorse
            }
            _ => HarmDirection::LowerIsWorse,
        }
    }

    /// The end of the valid range deterioration moves toward (floor or ceiling).
    pub fn harmful_limit(self) -> f64 {
        let range = self.valid_range();
        match self.harm_direction() {
            HarmDirection::LowerIsWorse => range.min,
            HarmDirection::HigherIsWorse => range.max,
        }
    }

    /// Value treated as fully healthy when scoring overall health.
    pub fn healthy_reference(self) -> f64 {
        match self {
            HealthMetric::MuscleMass => 50.0,
            HealthMetric::BoneDensity => 0.0,
            HealthMetric::CardiovascularFitness => 0.8,
            HealthMetric::ImmuneFunction => 0.8,
            HealthMetric::CognitivePerformance => 0.8,
            HealthMetric::RadiationDnaDamage => 0.05,
            HealthMetric::StressLevel => 0.3,
            HealthMetric::SleepQuality => 0.8,
        }
    }

    /// Health contribution of a value: 0.0 at the harmful limit, 1.0 at or
    /// beyond the healthy reference.
    pub fn health_score(self, value: f64) -> f64 {
        let limit = self.harmful_limit();
        let reference = self.healthy_reference();
        let score = (value - limit) / (reference - limit);
        score.clamp(0.0, 1.0)
    }

    /// Fraction of the way from `baseline` to the harmful limit that `value`
    /// has travelled. Improvements count as zero.
    pub fn deterioration_fraction(self, baseline: f64, value: f64) -> f64 {
        let limit = self.harmful_limit();
        let headroom = (limit - baseline).abs();
        if headroom <= f64::EPSILON {
            return 0.0;
        }
        let moved = match self.harm_direction() {
            HarmDirection::LowerIsWorse => baseline - value,
            HarmDirection::HigherIsWorse => value - baseline,
        };
        (moved / headroom).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for HealthMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Overall health classification derived from the composite health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Excellent
        } else if score >= 0.75 {
            Self::Good
        } else if score >= 0.6 {
            Self::Fair
        } else if score >= 0.4 {
            Self::Poor
        } else {
            Self::Critical
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Critical => write!(f, "CRITICAL"),
            HealthStatus::Poor => write!(f, "POOR"),
            HealthStatus::Fair => write!(f, "FAIR"),
            HealthStatus::Good => write!(f, "GOOD"),
            HealthStatus::Excellent => write!(f, "EXCELLENT"),
        }
    }
}

/// Health metric values at one day offset of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetricSnapshot {
    /// Days since mission start
    pub day: u32,
    pub values: BTreeMap<HealthMetric, f64>,
}

impl HealthMetricSnapshot {
    pub fn new(day: u32, values: BTreeMap<HealthMetric, f64>) -> Self {
        Self { day, values }
    }

    /// Value of a metric, or NaN when absent (never the case for projected snapshots).
    pub fn value(&self, metric: HealthMetric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(f64::NAN)
    }

    /// Mean health score across every metric present, 0.0-1.0.
    pub fn overall_health_score(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .values
            .iter()
            .map(|(metric, value)| metric.health_score(*value))
            .sum();
        total / self.values.len() as f64
    }

    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::from_score(self.overall_health_score())
    }

    /// 1 - health score of one metric; how far it is from healthy.
    pub fn deficit(&self, metric: HealthMetric) -> f64 {
        self.values
            .get(&metric)
            .map_or(0.0, |v| 1.0 - metric.health_score(*v))
    }
}
