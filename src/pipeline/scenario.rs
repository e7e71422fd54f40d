//! Scenario files: one mission and the crew flying it
//!
//! ```toml
//! [mission]
//! name = "Mars Transit Alpha"
//! duration_days = 500
//! destination = "mars_transit"
//! radiation_msv_per_day = 0.67
//! countermeasures = "moderate"
//!
//! [[astronauts]]
//! name = "Alex Rivera"
//! age = 38
//! sex = "female"
//! [astronauts.baseline]
//! muscle_mass_kg = 55.0
//! bone_density_t_score = 0.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{AstronautProfile, MissionParameters};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("scenario {0} lists no astronauts")]
    NoCrew(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Validated while parsing; an implausible mission fails the whole file
    pub mission: MissionParameters,
    pub astronauts: Vec<AstronautProfile>,
}

impl Scenario {
    pub fn load_from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Self = toml::from_str(&contents).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if scenario.astronauts.is_empty() {
            return Err(ScenarioError::NoCrew(path.to_path_buf()));
        }
        Ok(scenario)
    }

    /// Reference astronaut on the reference Mars transit mission.
    pub fn sample() -> Self {
        Self {
            mission: MissionParameters::sample(),
            astronauts: vec![AstronautProfile::sample()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CountermeasureRegimen, Destination};

    #[test]
    fn test_parse_scenario_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(
            &path,
            r#"
[mission]
name = "Gateway Rotation"
duration_days = 180
destination = "lunar"
radiation_msv_per_day = 0.8
countermeasures = "light"

[[astronauts]]
name = "Kai Lindqvist"
age = 45
sex = "male"

[astronauts.baseline]
muscle_mass_kg = 62.0
bone_density_t_score = 0.4
"#,
        )
        .unwrap();

        let scenario = Scenario::load_from_file(&path).unwrap();
        assert_eq!(scenario.mission.destination(), Destination::Lunar);
        assert_eq!(scenario.mission.countermeasures(), CountermeasureRegimen::Light);
        assert_eq!(scenario.astronauts.len(), 1);
        assert_eq!(scenario.astronauts[0].baseline.muscle_mass_kg, 62.0);
    }

    #[test]
    fn test_implausible_mission_rejected_at_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(
            &path,
            r#"
[mission]
duration_days = 180
destination = "low_earth_orbit"
radiation_msv_per_day = 40.0

[[astronauts]]
name = "X"
age = 40
sex = "male"
[astronauts.baseline]
muscle_mass_kg = 60.0
bone_density_t_score = 0.0
"#,
        )
        .unwrap();
        assert!(matches!(
            Scenario::load_from_file(&path),
            Err(ScenarioError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_crew_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(
            &path,
            r#"
astronauts = []

[mission]
duration_days = 10
destination = "lunar"
radiation_msv_per_day = 0.5
"#,
        )
        .unwrap();
        assert!(matches!(
            Scenario::load_from_file(&path),
            Err(ScenarioError::NoCrew(_))
        ));
    }
}
