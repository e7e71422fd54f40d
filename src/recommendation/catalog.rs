//! Static intervention reference table
//!
//! Loaded once at startup (built-in or from a versioned TOML document) and
//! handed to the engine by value. Never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::defaults::INTERVENTIONS_ENV_VAR;
use crate::types::{HealthMetric, Intervention, InterventionCategory, MissionPhase, RiskCategory};

/// Version tag of the built-in table.
pub const BUILTIN_TABLE_VERSION: &str = "2024.1";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read intervention table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse intervention table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("intervention table invalid: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Versioned, immutable set of candidate interventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionTable {
    pub version: String,
    pub interventions: Vec<Intervention>,
}

impl Default for InterventionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl InterventionTable {
    /// Resolve the table: explicit path, then `$AHSE_INTERVENTIONS`, then built-in.
    ///
    /// An explicitly requested file that fails to load is an error; the env var
    /// falls back to the built-in table with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CatalogError> {
        if let Some(path) = explicit {
            let table = Self::load_from_file(path)?;
            info!(path = %path.display(), version = %table.version, "Loaded intervention table");
            return Ok(table);
        }

        if let Ok(path) = std::env::var(INTERVENTIONS_ENV_VAR) {
            let p = PathBuf::from(&path);
            match Self::load_from_file(&p) {
                Ok(table) => {
                    info!(path = %p.display(), version = %table.version, "Loaded intervention table from AHSE_INTERVENTIONS");
                    return Ok(table);
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "Failed to load AHSE_INTERVENTIONS, using built-in table");
                }
            }
        }

        Ok(Self::builtin())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Self = toml::from_str(&contents).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        table.validate()?;
        Ok(table)
    }

    /// Structural checks: unique non-empty names, non-empty targets, benefit in
    /// [0, 1], and every risk category addressed by some intervention.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut errors = Vec::new();

        if self.version.trim().is_empty() {
            errors.push("version must not be empty".to_string());
        }
        if self.interventions.is_empty() {
            errors.push("table holds no interventions".to_string());
        }

        let mut seen = HashSet::new();
        for i in &self.interventions {
            if i.name.trim().is_empty() {
                errors.push("intervention with empty name".to_string());
            } else if !seen.insert(i.name.as_str()) {
                errors.push(format!("duplicate intervention '{}'", i.name));
            }
            if i.targets.is_empty() {
                errors.push(format!("'{}' targets no metric", i.name));
            }
            if !(0.0..=1.0).contains(&i.benefit) {
                errors.push(format!("'{}' benefit {} outside [0, 1]", i.name, i.benefit));
            }
        }

        // Every risk category needs at least one candidate
        for category in RiskCategory::ALL {
            if !self.interventions.iter().any(|i| i.addresses(category)) {
                errors.push(format!("no intervention addresses {category}"));
            }
        }

        if !self.interventions.iter().any(|i| i.maintenance) {
            warn!(version = %self.version, "Intervention table has no maintenance interventions");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Invalid(errors))
        }
    }

    pub fn get(&self, name: &str) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.name == name)
    }

    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    /// Built-in countermeasure table.
    pub fn builtin() -> Self {
        use HealthMetric::{
            BoneDensity, CardiovascularFitness, CognitivePerformance, ImmuneFunction, MuscleMass,
            RadiationDnaDamage, SleepQuality, StressLevel,
        };
        use InterventionCategory::{Behavioral, Exercise, Nutrition, Pharmacological, Shielding};

        let entry = |name: &str,
                     description: &str,
                     targets: &[HealthMetric],
                     benefit: f64,
                     category: InterventionCategory,
                     phase: MissionPhase,
                     maintenance: bool| Intervention {
            name: name.to_string(),
            description: description.to_string(),
            targets: targets.to_vec(),
            benefit,
            category,
            phase,
            maintenance,
        };

        let interventions = vec![
            entry(
                "Resistance Training (ARED)",
                "Daily high-load resistance exercise on the advanced resistive exercise device",
                &[MuscleMass, BoneDensity],
                0.85,
                Exercise,
                MissionPhase::Any,
                true,
            ),
            entry(
                "Aerobic Conditioning (CEVIS)",
                "Cycle ergometer sessions at 70-80% VO2max, 5 days per week",
                &[CardiovascularFitness],
                0.75,
                Exercise,
                MissionPhase::Any,
                true,
            ),
            entry(
                "High-Intensity Interval Training",
                "Short interval protocol on treadmill or ergometer, 3 sessions per week",
                &[CardiovascularFitness, MuscleMass],
                0.7,
                Exercise,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Protein & Amino Acid Supplementation",
                "Raise protein intake to 1.5 g/kg/day with leucine-enriched supplements",
                &[MuscleMass],
                0.55,
                Nutrition,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Vitamin D & Calcium Supplementation",
                "800 IU vitamin D and 1000 mg calcium daily",
                &[BoneDensity],
                0.5,
                Nutrition,
                MissionPhase::Early,
                false,
            ),
            entry(
                "Antioxidant-Rich Diet",
                "Increase dietary antioxidants to support DNA repair and immune response",
                &[RadiationDnaDamage, ImmuneFunction],
                0.35,
                Nutrition,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Bisphosphonate Therapy",
                "Weekly alendronate to suppress bone resorption",
                &[BoneDensity],
                0.7,
                Pharmacological,
                MissionPhase::Early,
                false,
            ),
            entry(
                "Radioprotective Agents",
                "Prophylactic radioprotectants ahead of elevated exposure periods",
                &[RadiationDnaDamage],
                0.45,
                Pharmacological,
                MissionPhase::Mid,
                false,
            ),
            entry(
                "Immune Monitoring",
                "Periodic immune panel with prophylactic treatment of latent viral reactivation",
                &[ImmuneFunction],
                0.4,
                Pharmacological,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Storm Shelter Protocol",
                "Shelter in the shielded core during solar particle events",
                &[RadiationDnaDamage],
                0.65,
                Shielding,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Water-Wall Sleep Station Shielding",
                "Relocate crew quarters behind water or polyethylene shielding",
                &[RadiationDnaDamage, SleepQuality],
                0.4,
                Shielding,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Cognitive Training & Behavioral Health Support",
                "Structured cognitive exercises and scheduled private psychological conferences",
                &[CognitivePerformance, StressLevel],
                0.5,
                Behavioral,
                MissionPhase::Any,
                false,
            ),
            entry(
                "Circadian Lighting & Sleep Hygiene",
                "Tunable lighting schedule and protected 8.5 hour sleep window",
                &[SleepQuality, StressLevel],
                0.55,
                Behavioral,
                MissionPhase::Any,
                false,
            ),
        ];

        Self {
            version: BUILTIN_TABLE_VERSION.to_string(),
            interventions,
        }
    }
}
