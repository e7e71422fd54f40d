//! Astronaut profile: identity, baseline physiology and personal modifiers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{HealthMetric, HealthMetricSnapshot};
use crate::error::ValidationError;

/// Youngest and oldest astronaut ages accepted for projection.
pub const MIN_ASTRONAUT_AGE: u32 = 21;
pub const MAX_ASTRONAUT_AGE: u32 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

/// Pre-flight physiological values. One field per `HealthMetric`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineHealth {
    /// Lean muscle mass (kg)
    pub muscle_mass_kg: f64,
    /// Bone density T-score
    pub bone_density_t_score: f64,
    /// Cardiovascular fitness (0-1)
    #[serde(default = "default_cardiovascular")]
    pub cardiovascular_fitness: f64,
    /// Immune function (0-1)
    #[serde(default = "default_immune")]
    pub immune_function: f64,
    /// Cognitive performance (0-1)
    #[serde(default = "default_cognitive")]
    pub cognitive_performance: f64,
    /// Pre-existing DNA damage level (0-1)
    #[serde(default = "default_dna_damage")]
    pub dna_damage_level: f64,
    /// Stress level (0-1)
    #[serde(default = "default_stress")]
    pub stress_level: f64,
    /// Sleep quality (0-1)
    #[serde(default = "default_sleep")]
    pub sleep_quality: f64,
}

fn default_cardiovascular() -> f64 { 0.85 }
fn default_immune() -> f64 { 0.9 }
fn default_cognitive() -> f64 { 0.9 }
fn default_dna_damage() -> f64 { 0.05 }
fn default_stress() -> f64 { 0.2 }
fn default_sleep() -> f64 { 0.85 }

impl Default for BaselineHealth {
    fn default() -> Self {
        Self {
            muscle_mass_kg: 55.0,
            bone_density_t_score: 0.0,
            cardiovascular_fitness: default_cardiovascular(),
            immune_function: default_immune(),
            cognitive_performance: default_cognitive(),
            dna_damage_level: default_dna_damage(),
            stress_level: default_stress(),
            sleep_quality: default_sleep(),
        }
    }
}

impl BaselineHealth {
    pub fn value(&self, metric: HealthMetric) -> f64 {
        match metric {
            HealthMetric::MuscleMass => self.muscle_mass_kg,
            HealthMetric::BoneDensity => self.bone_density_t_score,
            HealthMetric::CardiovascularFitness => self.cardiovascular_fitness,
            HealthMetric::ImmuneFunction => self.immune_function,
            HealthMetric::CognitivePerformance => self.cognitive_performance,
            HealthMetric::RadiationDnaDamage => self.dna_damage_level,
            HealthMetric::StressLevel => self.stress_level,
            HealthMetric::SleepQuality => self.sleep_quality,
        }
    }

    /// Day-0 snapshot holding the baseline values unchanged.
    pub fn to_snapshot(&self) -> HealthMetricSnapshot {
        let values: BTreeMap<HealthMetric, f64> = HealthMetric::ALL
            .iter()
            .map(|m| (*m, self.value(*m)))
            .collect();
        HealthMetricSnapshot::new(0, values)
    }
}

/// Fitness and genetic modifiers that scale personal deterioration rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalModifiers {
    /// Pre-flight fitness level (0-1). Fitter crew lose muscle and aerobic capacity slower.
    #[serde(default = "default_fitness")]
    pub fitness_level: f64,
    /// Genetic resilience (0-1). Scales every deterioration rate.
    #[serde(default = "default_resilience")]
    pub genetic_resilience: f64,
}

fn default_fitness() -> f64 { 0.7 }
fn default_resilience() -> f64 { 0.5 }

impl Default for PhysiologicalModifiers {
    fn default() -> Self {
        Self {
            fitness_level: default_fitness(),
            genetic_resilience: default_resilience(),
        }
    }
}

/// Caller-supplied astronaut description. Read-only once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstronautProfile {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub baseline: BaselineHealth,
    #[serde(default)]
    pub modifiers: PhysiologicalModifiers,
    /// Prior missions flown (informational only)
    #[serde(default)]
    pub mission_history: Vec<String>,
}

impl AstronautProfile {
    /// Check every field before any projection work starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Invalid(
                "astronaut name must not be empty".to_string(),
            ));
        }
        if !(MIN_ASTRONAUT_AGE..=MAX_ASTRONAUT_AGE).contains(&self.age) {
            return Err(ValidationError::OutOfRange {
                field: "age".to_string(),
                value: f64::from(self.age),
                min: f64::from(MIN_ASTRONAUT_AGE),
                max: f64::from(MAX_ASTRONAUT_AGE),
            });
        }

        for metric in HealthMetric::ALL {
            let value = self.baseline.value(metric);
            let field = format!("baseline.{}", metric.key());
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
            let range = metric.valid_range();
            if !range.contains(value) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
            let limit = metric.harmful_limit();
            if (value - limit).abs() <= f64::EPSILON {
                return Err(ValidationError::BaselineAtHarmfulLimit {
                    metric,
                    value,
                    limit,
                });
            }
        }

        check_unit_interval("modifiers.fitness_level", self.modifiers.fitness_level)?;
        check_unit_interval(
            "modifiers.genetic_resilience",
            self.modifiers.genetic_resilience,
        )?;
        Ok(())
    }

    /// Reference astronaut used by the CLI when no scenario file is given.
    pub fn sample() -> Self {
        Self {
            name: "Alex Rivera".to_string(),
            age: 38,
            sex: Sex::Female,
            baseline: BaselineHealth::default(),
            modifiers: PhysiologicalModifiers::default(),
            mission_history: vec!["ISS Expedition 64".to_string(), "Artemis III".to_string()],
        }
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_profile_validates() {
        assert!(AstronautProfile::sample().validate().is_ok());
    }

    #[test]
    fn test_rejects_underage() {
        let mut p = AstronautProfile::sample();
        p.age = 16;
        assert!(matches!(
            p.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "age"
        ));
    }

    #[test]
    fn test_rejects_baseline_at_harmful_limit() {
        let mut p = AstronautProfile::sample();
        p.baseline.dna_damage_level = 1.0;
        assert!(matches!(
            p.validate(),
            Err(ValidationError::BaselineAtHarmfulLimit {
                metric: HealthMetric::RadiationDnaDamage,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_baseline() {
        let mut p = AstronautProfile::sample();
        p.baseline.sleep_quality = f64::NAN;
        assert!(matches!(p.validate(), Err(ValidationError::NotFinite { .. })));
    }

    #[test]
    fn test_baseline_snapshot_is_day_zero() {
        let snapshot = BaselineHealth::default().to_snapshot();
        assert_eq!(snapshot.day, 0);
        assert_eq!(snapshot.values.len(), HealthMetric::ALL.len());
        assert_eq!(snapshot.value(HealthMetric::MuscleMass), 55.0);
    }

    #[test]
    fn test_profile_toml_defaults() {
        let toml_str = r#"
name = "Test"
age = 40
sex = "male"

[baseline]
muscle_mass_kg = 60.0
bone_density_t_score = 0.5
"#;
        let p: AstronautProfile = toml::from_str(toml_str).unwrap();
        assert_eq!(p.baseline.sleep_quality, 0.85);
        assert_eq!(p.modifiers.fitness_level, 0.7);
        assert!(p.mission_history.is_empty());
        assert!(p.validate().is_ok());
    }
}
