//! Mission parameters, validated at construction

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest mission the model accepts regardless of configuration (10 years).
pub const MAX_MISSION_DAYS: u32 = 3_650;

/// Mission destination / gravity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Microgravity inside the magnetosphere
    LowEarthOrbit,
    /// Lunar orbit / surface, 0.166 g
    Lunar,
    /// Deep-space cruise, microgravity, full galactic cosmic ray exposure
    MarsTransit,
    /// Planetary surface stay, 0.38 g
    PlanetarySurface,
}

impl Destination {
    pub const ALL: [Destination; 4] = [
        Destination::LowEarthOrbit,
        Destination::Lunar,
        Destination::MarsTransit,
        Destination::PlanetarySurface,
    ];

    /// Nominal gravity level in g.
    pub fn gravity_g(self) -> f64 {
        match self {
            Destination::LowEarthOrbit | Destination::MarsTransit => 0.0,
            Destination::Lunar => 0.166,
            Destination::PlanetarySurface => 0.38,
        }
    }

    /// Physically plausible radiation exposure for this destination (mSv/day).
    pub fn radiation_bounds(self) -> (f64, f64) {
        match self {
            Destination::LowEarthOrbit => (0.05, 1.5),
            Destination::Lunar => (0.1, 3.0),
            Destination::MarsTransit => (0.2, 5.0),
            Destination::PlanetarySurface => (0.05, 3.0),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Destination::LowEarthOrbit => "low_earth_orbit",
            Destination::Lunar => "lunar",
            Destination::MarsTransit => "mars_transit",
            Destination::PlanetarySurface => "planetary_surface",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Exercise countermeasure intensity.
///
/// `None` is the default and the most pessimistic case: baseline decay rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountermeasureRegimen {
    #[default]
    None,
    Light,
    Moderate,
    Intensive,
}

impl CountermeasureRegimen {
    pub fn key(self) -> &'static str {
        match self {
            CountermeasureRegimen::None => "none",
            CountermeasureRegimen::Light => "light",
            CountermeasureRegimen::Moderate => "moderate",
            CountermeasureRegimen::Intensive => "intensive",
        }
    }
}

impl std::fmt::Display for CountermeasureRegimen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionRegimen {
    Restricted,
    #[default]
    Standard,
    Enhanced,
}

impl std::fmt::Display for NutritionRegimen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NutritionRegimen::Restricted => write!(f, "restricted"),
            NutritionRegimen::Standard => write!(f, "standard"),
            NutritionRegimen::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Unvalidated mission description as it appears in request payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSpec {
    #[serde(default)]
    pub name: String,
    pub duration_days: u32,
    pub destination: Destination,
    pub radiation_msv_per_day: f64,
    #[serde(default)]
    pub countermeasures: CountermeasureRegimen,
    #[serde(default)]
    pub nutrition: NutritionRegimen,
}

/// Validated mission parameters.
///
/// Only constructible through [`MissionParameters::new`] or deserialization,
/// both of which reject implausible values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionSpec", into = "MissionSpec")]
pub struct MissionParameters {
    name: String,
    duration_days: u32,
    destination: Destination,
    radiation_msv_per_day: f64,
    countermeasures: CountermeasureRegimen,
    nutrition: NutritionRegimen,
}

impl MissionParameters {
    pub fn new(spec: MissionSpec) -> Result<Self, ValidationError> {
        validate_spec(&spec)?;
        Ok(Self {
            name: spec.name,
            duration_days: spec.duration_days,
            destination: spec.destination,
            radiation_msv_per_day: spec.radiation_msv_per_day,
            countermeasures: spec.countermeasures,
            nutrition: spec.nutrition,
        })
    }

    /// Re-run the construction checks. Used by the projection to fail fast.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_spec(&self.to_spec())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn radiation_msv_per_day(&self) -> f64 {
        self.radiation_msv_per_day
    }

    pub fn countermeasures(&self) -> CountermeasureRegimen {
        self.countermeasures
    }

    pub fn nutrition(&self) -> NutritionRegimen {
        self.nutrition
    }

    pub fn to_spec(&self) -> MissionSpec {
        MissionSpec {
            name: self.name.clone(),
            duration_days: self.duration_days,
            destination: self.destination,
            radiation_msv_per_day: self.radiation_msv_per_day,
            countermeasures: self.countermeasures,
            nutrition: self.nutrition,
        }
    }

    /// Same mission with a different countermeasure regimen (for what-if runs).
    pub fn with_countermeasures(&self, regimen: CountermeasureRegimen) -> Self {
        Self {
            countermeasures: regimen,
            ..self.clone()
        }
    }

    /// Reference Mars transit mission used by the CLI when no scenario is given.
    pub fn sample() -> Self {
        Self {
            name: "Mars Transit Alpha".to_string(),
            duration_days: 500,
            destination: Destination::MarsTransit,
            radiation_msv_per_day: 0.67,
            countermeasures: CountermeasureRegimen::Moderate,
            nutrition: NutritionRegimen::Standard,
        }
    }
}

impl TryFrom<MissionSpec> for MissionParameters {
    type Error = ValidationError;

    fn try_from(spec: MissionSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<MissionParameters> for MissionSpec {
    fn from(params: MissionParameters) -> Self {
        params.to_spec()
    }
}

fn validate_spec(spec: &MissionSpec) -> Result<(), ValidationError> {
    if spec.duration_days > MAX_MISSION_DAYS {
        return Err(ValidationError::DurationTooLong {
            days: spec.duration_days,
            max: MAX_MISSION_DAYS,
        });
    }

    let rad = spec.radiation_msv_per_day;
    if !rad.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "radiation_msv_per_day".to_string(),
        });
    }
    let (min, max) = spec.destination.radiation_bounds();
    if rad < min || rad > max {
        return Err(ValidationError::ImplausibleRadiation {
            destination: spec.destination.to_string(),
            value: rad,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(duration_days: u32, destination: Destination, rad: f64) -> MissionSpec {
        MissionSpec {
            name: String::new(),
            duration_days,
            destination,
            radiation_msv_per_day: rad,
            countermeasures: CountermeasureRegimen::default(),
            nutrition: NutritionRegimen::default(),
        }
    }

    #[test]
    fn test_sample_mission_is_valid() {
        assert!(MissionParameters::sample().validate().is_ok());
    }

    #[test]
    fn test_rejects_overlong_mission() {
        let err = MissionParameters::new(spec(4_000, Destination::MarsTransit, 0.7)).unwrap_err();
        assert_eq!(err, ValidationError::DurationTooLong { days: 4_000, max: MAX_MISSION_DAYS });
    }

    #[test]
    fn test_rejects_implausible_radiation_for_destination() {
        // Deep space cruise cannot be below the GCR floor
        let err = MissionParameters::new(spec(200, Destination::MarsTransit, 0.0)).unwrap_err();
        assert!(matches!(err, ValidationError::ImplausibleRadiation { .. }));
        assert!(MissionParameters::new(spec(200, Destination::LowEarthOrbit, 0.3)).is_ok());
    }

    #[test]
    fn test_rejects_nan_radiation() {
        let err = MissionParameters::new(spec(10, Destination::Lunar, f64::NAN)).unwrap_err();
        assert!(matches!(err, ValidationError::NotFinite { .. }));
    }

    #[test]
    fn test_zero_duration_is_accepted() {
        let m = MissionParameters::new(spec(0, Destination::LowEarthOrbit, 0.3)).unwrap();
        assert_eq!(m.duration_days(), 0);
    }

    #[test]
    fn test_defaults_to_no_countermeasures() {
        assert_eq!(CountermeasureRegimen::default(), CountermeasureRegimen::None);
    }

    #[test]
    fn test_deserialization_validates() {
        let bad = r#"{"duration_days": 100, "destination": "lunar", "radiation_msv_per_day": 9.0}"#;
        assert!(serde_json::from_str::<MissionParameters>(bad).is_err());

        let good = r#"{"duration_days": 100, "destination": "lunar", "radiation_msv_per_day": 1.0, "countermeasures": "intensive"}"#;
        let m: MissionParameters = serde_json::from_str(good).unwrap();
        assert_eq!(m.countermeasures(), CountermeasureRegimen::Intensive);
        assert_eq!(m.nutrition(), NutritionRegimen::Standard);
    }
}
