//! Projection Module
//!
//! Deterministic health-trajectory projection. Given an astronaut profile and
//! mission parameters, evaluates closed-form decay curves at a fixed sampling
//! interval and derives a risk assessment for every sample.
//!
//! ## Functions
//! - `project()` - full run: validation, sampling, risk, invariant checks
//! - `sample_days()` - sampled day offsets for a duration
//! - `metric_curves()` / `daily_loss()` - per-metric deterioration models
//! - `assess_risk()` - category probabilities and severity tiers

pub mod decay_models;
pub mod risk;

pub use decay_models::{daily_loss, metric_curves, MetricCurve};
pub use risk::{assess_risk, category_probability};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::error::{ComputationError, SimulationError, ValidationError};
use crate::types::{
    AstronautProfile, HarmDirection, HealthMetric, HealthMetricSnapshot, MissionParameters,
    RiskAssessment,
};

/// Absolute tolerance for the monotonicity checks (float noise only).
const MONOTONE_TOLERANCE: f64 = 1e-9;

/// One sampled day of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub snapshot: HealthMetricSnapshot,
    pub risk: RiskAssessment,
}

/// Output of one projection. Produced fresh per call, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRun {
    pub astronaut: String,
    pub mission: MissionParameters,
    /// Day-0 values the deterioration fractions are measured from
    pub baseline: HealthMetricSnapshot,
    /// Strictly increasing day offsets, first is day 0, last is the mission duration
    pub points: Vec<TrajectoryPoint>,
}

impl ProjectionRun {
    pub fn final_point(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.points.iter().map(|p| p.snapshot.day)
    }
}

/// Project an astronaut's health over a mission.
///
/// Fails fast with `SimulationError::Validation` before computing anything if
/// either input is invalid or the mission exceeds `simulation.max_simulation_days`.
/// Any invariant violation in the computed trajectory is a
/// `SimulationError::Computation`.
pub fn project(
    profile: &AstronautProfile,
    mission: &MissionParameters,
    config: &SimConfig,
) -> Result<ProjectionRun, SimulationError> {
    if let Err(e) = validate_inputs(profile, mission, config) {
        warn!(astronaut = %profile.name, error = %e, "Rejected projection input");
        return Err(e.into());
    }

    let days = sample_days(mission.duration_days(), config.simulation.sample_interval_days);
    debug!(
        astronaut = %profile.name,
        mission = mission.name(),
        destination = %mission.destination(),
        countermeasures = %mission.countermeasures(),
        duration_days = mission.duration_days(),
        samples = days.len(),
        "Projecting health trajectory"
    );

    let curves = metric_curves(profile, mission, config);
    let baseline = profile.baseline.to_snapshot();

    let mut points: Vec<TrajectoryPoint> = Vec::with_capacity(days.len());
    for day in days {
        let values: BTreeMap<HealthMetric, f64> =
            curves.iter().map(|c| (c.metric, c.value_at(day))).collect();
        let snapshot = HealthMetricSnapshot::new(day, values);
        check_snapshot(&snapshot)?;

        let risk = assess_risk(&baseline, &snapshot);
        if let Some(prev) = points.last() {
            check_progression(prev, &snapshot, &risk)?;
        }
        points.push(TrajectoryPoint { snapshot, risk });
    }

    let run = ProjectionRun {
        astronaut: profile.name.clone(),
        mission: mission.clone(),
        baseline,
        points,
    };

    if let Some(last) = run.final_point() {
        info!(
            astronaut = %run.astronaut,
            final_day = last.snapshot.day,
            health_score = %format!("{:.3}", last.snapshot.overall_health_score()),
            status = %last.snapshot.health_status(),
            risk_categories = last.risk.categories.len(),
            "Projection complete"
        );
    }
    Ok(run)
}

/// Day offsets sampled for a mission: 0, interval, 2×interval, ... and
/// always the final day. A zero interval is treated as daily sampling.
pub fn sample_days(duration_days: u32, interval_days: u32) -> Vec<u32> {
    let step = interval_days.max(1) as usize;
    let mut days: Vec<u32> = (0..=duration_days).step_by(step).collect();
    if days.last() != Some(&duration_days) {
        days.push(duration_days);
    }
    days
}

fn validate_inputs(
    profile: &AstronautProfile,
    mission: &MissionParameters,
    config: &SimConfig,
) -> Result<(), ValidationError> {
    profile.validate()?;
    mission.validate()?;
    let max = config.simulation.max_simulation_days;
    if mission.duration_days() > max {
        return Err(ValidationError::DurationTooLong {
            days: mission.duration_days(),
            max,
        });
    }
    Ok(())
}

/// Range invariant: every value finite and inside its declared range.
fn check_snapshot(snapshot: &HealthMetricSnapshot) -> Result<(), ComputationError> {
    for (metric, value) in &snapshot.values {
        if !value.is_finite() {
            return Err(ComputationError::NonFiniteMetric {
                metric: *metric,
                day: snapshot.day,
            });
        }
        let range = metric.valid_range();
        if !range.contains(*value) {
            return Err(ComputationError::MetricOutOfRange {
                metric: *metric,
                day: snapshot.day,
                value: *value,
                min: range.min,
                max: range.max,
            });
        }
    }
    Ok(())
}

/// Ordering and monotonicity against the previous sample.
fn check_progression(
    prev: &TrajectoryPoint,
    snapshot: &HealthMetricSnapshot,
    risk: &RiskAssessment,
) -> Result<(), ComputationError> {
    if snapshot.day <= prev.snapshot.day {
        return Err(ComputationError::NonIncreasingDays {
            previous: prev.snapshot.day,
            current: snapshot.day,
        });
    }

    for (metric, current) in &snapshot.values {
        let previous = prev.snapshot.value(*metric);
        let improved = match metric.harm_direction() {
            HarmDirection::LowerIsWorse => *current > previous + MONOTONE_TOLERANCE,
            HarmDirection::HigherIsWorse => *current < previous - MONOTONE_TOLERANCE,
        };
        if improved {
            return Err(ComputationError::MetricImproved {
                metric: *metric,
                day: snapshot.day,
                previous,
                current: *current,
            });
        }
    }

    for (category, entry) in &prev.risk.categories {
        let current = risk.probability(*category);
        if current < entry.probability - MONOTONE_TOLERANCE {
            return Err(ComputationError::RiskDecreased {
                category: category.to_string(),
                day: snapshot.day,
                previous: entry.probability,
                current,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CountermeasureRegimen, Destination, MissionSpec, NutritionRegimen};

    fn mission(duration_days: u32) -> MissionParameters {
        MissionParameters::new(MissionSpec {
            name: "unit".to_string(),
            duration_days,
            destination: Destination::MarsTransit,
            radiation_msv_per_day: 0.67,
            countermeasures: CountermeasureRegimen::Moderate,
            nutrition: NutritionRegimen::Standard,
        })
        .unwrap()
    }

    #[test]
    fn test_sample_days_includes_final_day() {
        assert_eq!(sample_days(20, 7), vec![0, 7, 14, 20]);
        assert_eq!(sample_days(21, 7), vec![0, 7, 14, 21]);
        assert_eq!(sample_days(0, 7), vec![0]);
        assert_eq!(sample_days(3, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_duration_returns_baseline_only() {
        let profile = AstronautProfile::sample();
        let run = project(&profile, &mission(0), &SimConfig::default()).unwrap();
        assert_eq!(run.points.len(), 1);
        let only = &run.points[0];
        assert_eq!(only.snapshot, profile.baseline.to_snapshot());
        assert!(only.risk.is_empty());
    }

    #[test]
    fn test_rejects_duration_above_config_limit() {
        let mut config = SimConfig::default();
        config.simulation.max_simulation_days = 100;
        let err = project(&AstronautProfile::sample(), &mission(200), &config).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err,
            SimulationError::Validation(ValidationError::DurationTooLong { days: 200, max: 100 })
        );
    }

    #[test]
    fn test_rejects_invalid_profile_before_computing() {
        let mut profile = AstronautProfile::sample();
        profile.baseline.muscle_mass_kg = 500.0;
        let err = project(&profile, &mission(30), &SimConfig::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_decay_rate_is_caught_as_computation_error() {
        let mut config = SimConfig::default();
        config.decay.sleep_quality = -0.001;
        let err = project(&AstronautProfile::sample(), &mission(30), &config).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Computation(ComputationError::MetricImproved {
                metric: HealthMetric::SleepQuality,
                ..
            })
        ));
    }

    #[test]
    fn test_days_strictly_increase() {
        let run =
            project(&AstronautProfile::sample(), &mission(100), &SimConfig::default()).unwrap();
        let days: Vec<u32> = run.days().collect();
        assert!(days.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(days.first(), Some(&0));
        assert_eq!(days.last(), Some(&100));
    }
}
