//! Simulation Configuration - decay constants, destination and countermeasure
//! factors, recommendation weights as operator-tunable TOML values
//!
//! Each struct implements `Default` with the reference constants, so a run
//! with no config file present uses the documented model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::{
    CountermeasureRegimen, Destination, HealthMetric, NutritionRegimen, MAX_MISSION_DAYS,
};

/// Environment variable naming a config file to load.
pub const CONFIG_ENV_VAR: &str = "AHSE_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "ahse.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the projection and recommendation pipeline.
///
/// Load with `SimConfig::load()` which searches:
/// 1. `$AHSE_CONFIG` env var
/// 2. `./ahse.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Sampling and duration limits
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Per-metric deterioration rates
    #[serde(default)]
    pub decay: DecayConfig,

    /// Gravity / isolation factors per destination
    #[serde(default)]
    pub destinations: DestinationsConfig,

    /// Mitigation factors per exercise regimen
    #[serde(default)]
    pub countermeasures: CountermeasuresConfig,

    /// Rate multipliers per nutritional regimen
    #[serde(default)]
    pub nutrition: NutritionConfig,

    /// Composite score weights and truncation
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

impl SimConfig {
    /// Load configuration using the standard search order:
    /// 1. `$AHSE_CONFIG` environment variable
    /// 2. `./ahse.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded simulation config from AHSE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from AHSE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "AHSE_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./ahse.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded simulation config from ./ahse.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./ahse.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No ahse.toml found, using built-in model constants");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let typo_warnings = super::validation::validate_unknown_keys(contents);
        for w in &typo_warnings {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a file (used by `check-config --write-defaults`).
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Simulation config saved");
        Ok(())
    }

    /// Validate all constants for internal consistency.
    ///
    /// Rules:
    /// - Every rate and factor must be finite
    /// - Mitigation factors lie in (0, 1] and never grow with regimen intensity
    /// - Recommendation weights must sum to approximately 1.0
    /// - Sample interval and top-K must be > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let s = &self.simulation;
        if s.sample_interval_days == 0 {
            errors.push("simulation.sample_interval_days must be > 0".to_string());
        }
        if s.max_simulation_days == 0 || s.max_simulation_days > MAX_MISSION_DAYS {
            errors.push(format!(
                "simulation.max_simulation_days = {} must be within 1..={MAX_MISSION_DAYS}",
                s.max_simulation_days
            ));
        }

        // Countermeasure intensity ordering: none >= light >= moderate >= intensive
        let c = &self.countermeasures;
        let ladder = [
            ("none", &c.none),
            ("light", &c.light),
            ("moderate", &c.moderate),
            ("intensive", &c.intensive),
        ];
        for pair in ladder.windows(2) {
            let (weaker_name, weaker) = pair[0];
            let (stronger_name, stronger) = pair[1];
            for (field, w, st) in [
                ("musculoskeletal", weaker.musculoskeletal, stronger.musculoskeletal),
                ("cardiovascular", weaker.cardiovascular, stronger.cardiovascular),
                ("neurobehavioral", weaker.neurobehavioral, stronger.neurobehavioral),
                ("immune", weaker.immune, stronger.immune),
            ] {
                if st > w {
                    errors.push(format!(
                        "countermeasures.{stronger_name}.{field} ({st:.3}) must be <= countermeasures.{weaker_name}.{field} ({w:.3})"
                    ));
                }
            }
        }

        // Recommendation weights: should sum to ~1.0 (allow 0.99-1.01)
        let r = &self.recommendation;
        let weight_sum = r.benefit_weight + r.severity_weight + r.category_weight;
        if !(0.99..=1.01).contains(&weight_sum) {
            errors.push(format!(
                "recommendation weights must sum to ~1.0, got {:.3}",
                weight_sum
            ));
        }
        if r.top_k == 0 {
            errors.push("recommendation.top_k must be > 0".to_string());
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn destination(&self, destination: Destination) -> &DestinationFactors {
        let d = &self.destinations;
        match destination {
            Destination::LowEarthOrbit => &d.low_earth_orbit,
            Destination::Lunar => &d.lunar,
            Destination::MarsTransit => &d.mars_transit,
            Destination::PlanetarySurface => &d.planetary_surface,
        }
    }

    pub fn mitigation(&self, regimen: CountermeasureRegimen) -> &MitigationFactors {
        let c = &self.countermeasures;
        match regimen {
            CountermeasureRegimen::None => &c.none,
            CountermeasureRegimen::Light => &c.light,
            CountermeasureRegimen::Moderate => &c.moderate,
            CountermeasureRegimen::Intensive => &c.intensive,
        }
    }

    pub fn nutrition_factor(&self, regimen: NutritionRegimen) -> f64 {
        match regimen {
            NutritionRegimen::Restricted => self.nutrition.restricted,
            NutritionRegimen::Standard => self.nutrition.standard,
            NutritionRegimen::Enhanced => self.nutrition.enhanced,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Simulation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Days between projected snapshots.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_days: u32,

    /// Longest mission this deployment will project.
    #[serde(default = "default_max_simulation_days")]
    pub max_simulation_days: u32,
}

fn default_sample_interval() -> u32 { 7 }
fn default_max_simulation_days() -> u32 { 1_000 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sample_interval_days: default_sample_interval(),
            max_simulation_days: default_max_simulation_days(),
        }
    }
}

// ============================================================================
// Decay Rates
// ============================================================================

/// Deterioration per day under microgravity with no countermeasures.
///
/// Muscle mass is a fraction of baseline mass per day; every other rate is in
/// the metric's own units per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    #[serde(default = "default_muscle_rate")]
    pub muscle_mass: f64,
    #[serde(default = "default_bone_rate")]
    pub bone_density: f64,
    #[serde(default = "default_cardio_rate")]
    pub cardiovascular_fitness: f64,
    #[serde(default = "default_immune_rate")]
    pub immune_function: f64,
    #[serde(default = "default_cognitive_rate")]
    pub cognitive_performance: f64,
    /// Background DNA damage accumulation, independent of dose.
    #[serde(default = "default_dna_rate")]
    pub radiation_dna_damage: f64,
    #[serde(default = "default_stress_rate")]
    pub stress_level: f64,
    #[serde(default = "default_sleep_rate")]
    pub sleep_quality: f64,
    /// Additional DNA damage per mSv of exposure.
    #[serde(default = "default_dna_per_msv")]
    pub dna_damage_per_msv: f64,
}

fn default_muscle_rate() -> f64 { 0.0012 }
fn default_bone_rate() -> f64 { 0.006 }
fn default_cardio_rate() -> f64 { 0.0012 }
fn default_immune_rate() -> f64 { 0.0011 }
fn default_cognitive_rate() -> f64 { 0.001 }
fn default_dna_rate() -> f64 { 0.0001 }
fn default_stress_rate() -> f64 { 0.001 }
fn default_sleep_rate() -> f64 { 0.001 }
fn default_dna_per_msv() -> f64 { 0.0008 }

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            muscle_mass: default_muscle_rate(),
            bone_density: default_bone_rate(),
            cardiovascular_fitness: default_cardio_rate(),
            immune_function: default_immune_rate(),
            cognitive_performance: default_cognitive_rate(),
            radiation_dna_damage: default_dna_rate(),
            stress_level: default_stress_rate(),
            sleep_quality: default_sleep_rate(),
            dna_damage_per_msv: default_dna_per_msv(),
        }
    }
}

impl DecayConfig {
    pub fn rate(&self, metric: HealthMetric) -> f64 {
        match metric {
            HealthMetric::MuscleMass => self.muscle_mass,
            HealthMetric::BoneDensity => self.bone_density,
            HealthMetric::CardiovascularFitness => self.cardiovascular_fitness,
            HealthMetric::ImmuneFunction => self.immune_function,
            HealthMetric::CognitivePerformance => self.cognitive_performance,
            HealthMetric::RadiationDnaDamage => self.radiation_dna_damage,
            HealthMetric::StressLevel => self.stress_level,
            HealthMetric::SleepQuality => self.sleep_quality,
        }
    }
}

// ============================================================================
// Destinations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationFactors {
    /// Unloading multiplier for musculoskeletal, cardiovascular and immune decay.
    pub gravity_factor: f64,
    /// Isolation / confinement multiplier for cognitive, stress and sleep decay.
    pub isolation_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationsConfig {
    #[serde(default = "default_leo")]
    pub low_earth_orbit: DestinationFactors,
    #[serde(default = "default_lunar")]
    pub lunar: DestinationFactors,
    #[serde(default = "default_mars_transit")]
    pub mars_transit: DestinationFactors,
    #[serde(default = "default_planetary_surface")]
    pub planetary_surface: DestinationFactors,
}

fn default_leo() -> DestinationFactors {
    DestinationFactors { gravity_factor: 1.0, isolation_factor: 0.8 }
}
fn default_lunar() -> DestinationFactors {
    DestinationFactors { gravity_factor: 0.75, isolation_factor: 0.9 }
}
fn default_mars_transit() -> DestinationFactors {
    DestinationFactors { gravity_factor: 1.0, isolation_factor: 1.0 }
}
fn default_planetary_surface() -> DestinationFactors {
    DestinationFactors { gravity_factor: 0.5, isolation_factor: 1.0 }
}

impl Default for DestinationsConfig {
    fn default() -> Self {
        Self {
            low_earth_orbit: default_leo(),
            lunar: default_lunar(),
            mars_transit: default_mars_transit(),
            planetary_surface: default_planetary_surface(),
        }
    }
}

// ============================================================================
// Countermeasures
// ============================================================================

/// Multiplicative reduction of decay rates by an exercise regimen, per
/// physiological system. Values in (0, 1]; 1.0 means no mitigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationFactors {
    /// Muscle mass and bone density
    pub musculoskeletal: f64,
    pub cardiovascular: f64,
    /// Cognitive performance, stress and sleep
    pub neurobehavioral: f64,
    pub immune: f64,
}

impl MitigationFactors {
    pub fn for_metric(&self, metric: HealthMetric) -> f64 {
        match metric {
            HealthMetric::MuscleMass | HealthMetric::BoneDensity => self.musculoskeletal,
            HealthMetric::CardiovascularFitness => self.cardiovascular,
            HealthMetric::CognitivePerformance
            | HealthMetric::StressLevel
            | HealthMetric::SleepQuality => self.neurobehavioral,
            HealthMetric::ImmuneFunction => self.immune,
            // Exercise does not shield against radiation
            HealthMetric::RadiationDnaDamage => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountermeasuresConfig {
    #[serde(default = "default_mitigation_none")]
    pub none: MitigationFactors,
    #[serde(default = "default_mitigation_light")]
    pub light: MitigationFactors,
    #[serde(default = "default_mitigation_moderate")]
    pub moderate: MitigationFactors,
    #[serde(default = "default_mitigation_intensive")]
    pub intensive: MitigationFactors,
}

fn default_mitigation_none() -> MitigationFactors {
    MitigationFactors {
        musculoskeletal: 1.0,
        cardiovascular: 1.0,
        neurobehavioral: 1.0,
        immune: 1.0,
    }
}
fn default_mitigation_light() -> MitigationFactors {
    MitigationFactors {
        musculoskeletal: 0.8,
        cardiovascular: 0.75,
        neurobehavioral: 0.95,
        immune: 0.95,
    }
}
fn default_mitigation_moderate() -> MitigationFactors {
    MitigationFactors {
        musculoskeletal: 0.5,
        cardiovascular: 0.5,
        neurobehavioral: 0.85,
        immune: 0.85,
    }
}
fn default_mitigation_intensive() -> MitigationFactors {
    MitigationFactors {
        musculoskeletal: 0.3,
        cardiovascular: 0.35,
        neurobehavioral: 0.8,
        immune: 0.8,
    }
}

impl Default for CountermeasuresConfig {
    fn default() -> Self {
        Self {
            none: default_mitigation_none(),
            light: default_mitigation_light(),
            moderate: default_mitigation_moderate(),
            intensive: default_mitigation_intensive(),
        }
    }
}

// ============================================================================
// Nutrition
// ============================================================================

/// Rate multipliers applied to muscle, bone and immune decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionConfig {
    #[serde(default = "default_nutrition_restricted")]
    pub restricted: f64,
    #[serde(default = "default_nutrition_standard")]
    pub standard: f64,
    #[serde(default = "default_nutrition_enhanced")]
    pub enhanced: f64,
}

fn default_nutrition_restricted() -> f64 { 1.15 }
fn default_nutrition_standard() -> f64 { 1.0 }
fn default_nutrition_enhanced() -> f64 { 0.9 }

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            restricted: default_nutrition_restricted(),
            standard: default_nutrition_standard(),
            enhanced: default_nutrition_enhanced(),
        }
    }
}

// ============================================================================
// Recommendation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Number of interventions kept before high-risk coverage is added.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Weight of benefit to the most deteriorated targeted metrics.
    #[serde(default = "default_benefit_weight")]
    pub benefit_weight: f64,

    /// Weight of the severity of addressed risk categories.
    #[serde(default = "default_severity_weight")]
    pub severity_weight: f64,

    /// Weight of the fixed intervention-category priority.
    #[serde(default = "default_category_weight")]
    pub category_weight: f64,
}

fn default_top_k() -> usize { 3 }
fn default_benefit_weight() -> f64 { 0.5 }
fn default_severity_weight() -> f64 { 0.35 }
fn default_category_weight() -> f64 { 0.15 }

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            benefit_weight: default_benefit_weight(),
            severity_weight: default_severity_weight(),
            category_weight: default_category_weight(),
        }
    }
}

// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: SimConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.simulation.sample_interval_days, 7);
        assert_eq!(config.simulation.max_simulation_days, 1_000);
        assert_eq!(config.decay.muscle_mass, 0.0012);
        assert_eq!(config.countermeasures.moderate.musculoskeletal, 0.5);
        assert_eq!(config.recommendation.top_k, 3);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[simulation]
sample_interval_days = 1

[destinations.lunar]
gravity_factor = 0.6
isolation_factor = 0.95
"#;
        let config: SimConfig = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.simulation.sample_interval_days, 1);
        assert_eq!(config.destination(Destination::Lunar).gravity_factor, 0.6);
        // Non-overridden values retain defaults
        assert_eq!(config.simulation.max_simulation_days, 1_000);
        assert_eq!(config.destination(Destination::MarsTransit).gravity_factor, 1.0);
    }

    #[test]
    fn test_validation_catches_inverted_mitigation() {
        let mut config = SimConfig::default();
        config.countermeasures.intensive.musculoskeletal = 0.9;
        let result = config.validate();
        assert!(result.is_err(), "Intensive weaker than moderate should fail validation");
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("countermeasures.intensive.musculoskeletal")));
        }
    }

    #[test]
    fn test_validation_catches_bad_weights() {
        let mut config = SimConfig::default();
        config.recommendation.benefit_weight = 0.9;
        config.recommendation.severity_weight = 0.9;
        assert!(config.validate().is_err(), "Weights summing to 1.95 should fail");
    }

    #[test]
    fn test_validation_catches_zero_interval() {
        let mut config = SimConfig::default();
        config.simulation.sample_interval_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let original = SimConfig::default();
        let toml_str = original.to_toml().expect("serialization should work");
        let roundtripped: SimConfig =
            toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(original, roundtripped);
    }

    #[test]
    fn test_all_sections_serialize() {
        let toml_str = SimConfig::default().to_toml().expect("serialization should work");
        assert!(toml_str.contains("[simulation]"), "Missing [simulation] section");
        assert!(toml_str.contains("[decay]"), "Missing [decay] section");
        assert!(toml_str.contains("[destinations.mars_transit]"), "Missing mars_transit section");
        assert!(toml_str.contains("[countermeasures.moderate]"), "Missing moderate section");
        assert!(toml_str.contains("[recommendation]"), "Missing [recommendation] section");
    }

    #[test]
    fn test_load_from_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ahse.toml");
        std::fs::write(&path, "[simulation\nsample_interval_days = 3").unwrap();
        let err = SimConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(ref p, _) if p == &path));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ahse.toml");
        let mut config = SimConfig::default();
        config.recommendation.top_k = 5;
        config.save_to_file(&path).unwrap();
        let loaded = SimConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.recommendation.top_k, 5);
    }
}
