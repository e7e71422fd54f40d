//! Per-metric deterioration curves
//!
//! Every curve is linear in elapsed days and saturates at the harmful end of
//! the metric's valid range:
//!
//! ```text
//! loss(t) = rate × scale × env × mitigation × nutrition × personal × t
//! ```
//!
//! - `scale` is the baseline value for baseline-relative curves (muscle mass), 1 otherwise
//! - `env` is the destination gravity factor (musculoskeletal, cardiovascular, immune)
//!   or isolation factor (cognitive, stress, sleep); DNA damage uses neither
//! - `mitigation` comes from the exercise regimen, in (0, 1]
//! - `nutrition` applies to muscle, bone and immune function
//! - `personal` folds in age, fitness, genetic resilience and sex
//!
//! Radiation DNA damage additionally accumulates `dna_damage_per_msv × dose × t`.
//! All factors are time-independent, so each curve is monotone.

use crate::config::{DestinationFactors, SimConfig};
use crate::types::{
    AstronautProfile, HarmDirection, HealthMetric, MissionParameters, NutritionRegimen, Sex,
};

/// Age above which musculoskeletal and cardiovascular decay accelerates.
const AGE_ACCELERATION_ONSET: u32 = 40;

/// Extra decay per year of age above the onset.
const AGE_ACCELERATION_PER_YEAR: f64 = 0.01;

/// Post-menopausal bone loss multiplier.
const FEMALE_BONE_FACTOR: f64 = 1.1;

/// A fully parameterised deterioration curve for one metric of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCurve {
    pub metric: HealthMetric,
    pub baseline: f64,
    /// Movement toward the harmful limit per day, in metric units. Never negative.
    pub daily_loss: f64,
}

impl MetricCurve {
    /// Clamped metric value after `day` days.
    pub fn value_at(&self, day: u32) -> f64 {
        let loss = self.daily_loss * f64::from(day);
        let raw = match self.metric.harm_direction() {
            HarmDirection::LowerIsWorse => self.baseline - loss,
            HarmDirection::HigherIsWorse => self.baseline + loss,
        };
        self.metric.valid_range().clamp(raw)
    }
}

/// Build one curve per metric, in canonical metric order.
pub fn metric_curves(
    profile: &AstronautProfile,
    mission: &MissionParameters,
    config: &SimConfig,
) -> Vec<MetricCurve> {
    HealthMetric::ALL
        .into_iter()
        .map(|metric| MetricCurve {
            metric,
            baseline: profile.baseline.value(metric),
            daily_loss: daily_loss(metric, profile, mission, config),
        })
        .collect()
}

/// Effective per-day movement of `metric` toward its harmful limit.
pub fn daily_loss(
    metric: HealthMetric,
    profile: &AstronautProfile,
    mission: &MissionParameters,
    config: &SimConfig,
) -> f64 {
    let scale = match metric {
        HealthMetric::MuscleMass => profile.baseline.value(metric),
        _ => 1.0,
    };

    let mut loss = config.decay.rate(metric)
        * scale
        * environment_factor(metric, config.destination(mission.destination()))
        * config.mitigation(mission.countermeasures()).for_metric(metric)
        * nutrition_factor(metric, config, mission.nutrition())
        * personal_factor(metric, profile);

    if metric == HealthMetric::RadiationDnaDamage {
        loss += config.decay.dna_damage_per_msv * mission.radiation_msv_per_day();
    }
    loss
}

/// Gravity or isolation multiplier for a metric at a destination.
pub fn environment_factor(metric: HealthMetric, factors: &DestinationFactors) -> f64 {
    match metric {
        HealthMetric::MuscleMass
        | HealthMetric::BoneDensity
        | HealthMetric::CardiovascularFitness
        | HealthMetric::ImmuneFunction => factors.gravity_factor,
        HealthMetric::CognitivePerformance
        | HealthMetric::StressLevel
        | HealthMetric::SleepQuality => factors.isolation_factor,
        HealthMetric::RadiationDnaDamage => 1.0,
    }
}

/// Diet multiplier; only protein/mineral-dependent systems respond.
pub fn nutrition_factor(
    metric: HealthMetric,
    config: &SimConfig,
    regimen: NutritionRegimen,
) -> f64 {
    match metric {
        HealthMetric::MuscleMass | HealthMetric::BoneDensity | HealthMetric::ImmuneFunction => {
            config.nutrition_factor(regimen)
        }
        _ => 1.0,
    }
}

/// Combined age, fitness, resilience and sex multiplier.
pub fn personal_factor(metric: HealthMetric, profile: &AstronautProfile) -> f64 {
    let mut factor = 1.0;

    if matches!(
        metric,
        HealthMetric::MuscleMass | HealthMetric::BoneDensity | HealthMetric::CardiovascularFitness
    ) {
        let years_over = profile.age.saturating_sub(AGE_ACCELERATION_ONSET);
        factor *= 1.0 + AGE_ACCELERATION_PER_YEAR * f64::from(years_over);
    }

    if matches!(
        metric,
        HealthMetric::MuscleMass | HealthMetric::CardiovascularFitness
    ) {
        factor *= 1.15 - 0.3 * profile.modifiers.fitness_level;
    }

    factor *= 1.1 - 0.2 * profile.modifiers.genetic_resilience;

    if metric == HealthMetric::BoneDensity && profile.sex == Sex::Female {
        factor *= FEMALE_BONE_FACTOR;
    }

    factor
}
