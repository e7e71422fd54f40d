//! Config Validation Tests
//!
//! Typo detection and physical range validation for the model constants
//! file, exercised independently from the projection pipeline.

use ahse::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use ahse::config::SimConfig;
use ahse::ConfigError;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_destination_factor_warns_with_suggestion() {
    let toml_str = r#"
[destinations.lunar]
gravty_factor = 0.7
isolation_factor = 0.9
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("gravty_factor"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("destinations.lunar.gravity_factor")
    );
    assert!(warnings[0].to_string().contains("did you mean"));
}

#[test]
fn typo_in_recommendation_section_warns() {
    let toml_str = r#"
[recommendation]
top_kk = 5
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("recommendation.top_k"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[simulation]
sample_interval_days = 1
max_simulation_days = 900

[decay]
muscle_mass = 0.0015
bone_density = 0.005
dna_damage_per_msv = 0.001

[destinations.mars_transit]
gravity_factor = 1.0
isolation_factor = 1.1

[countermeasures.light]
musculoskeletal = 0.85
cardiovascular = 0.8
neurobehavioral = 0.95
immune = 0.95

[nutrition]
restricted = 1.2
standard = 1.0
enhanced = 0.85

[recommendation]
top_k = 5
benefit_weight = 0.4
severity_weight = 0.4
category_weight = 0.2
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Valid config should produce 0 warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn unknown_section_warns() {
    let toml_str = r#"
[habitat]
volume_m3 = 90
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(!warnings.is_empty());
    assert!(warnings.iter().any(|w| w.field == "habitat"));
}

#[test]
fn multiple_typos_all_warned() {
    let toml_str = r#"
[simulation]
sample_intervl_days = 3

[nutrition]
enhnced = 0.8
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 2, "Expected 2 warnings for 2 typos");
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn known_keys_set_is_complete() {
    let toml_str = SimConfig::default()
        .to_toml()
        .expect("Default config should serialize");
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Default config serialization should produce 0 unknown-key warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let known = known_config_keys();
    assert!(suggest_correction("zzz_completely_invalid_xyz_12345", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn negative_decay_rate_is_error() {
    let mut config = SimConfig::default();
    config.decay.bone_density = -0.001;
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("decay.bone_density")));
}

#[test]
fn nan_dose_coefficient_is_error() {
    let mut config = SimConfig::default();
    config.decay.dna_damage_per_msv = f64::NAN;
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("dna_damage_per_msv")));
}

#[test]
fn zero_gravity_factor_is_error() {
    let mut config = SimConfig::default();
    config.destinations.planetary_surface.gravity_factor = 0.0;
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors
        .iter()
        .any(|e| e.contains("destinations.planetary_surface.gravity_factor")));
}

#[test]
fn zero_mitigation_is_error() {
    let mut config = SimConfig::default();
    config.countermeasures.intensive.immune = 0.0;
    let (errors, _) = validate_physical_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("countermeasures.intensive.immune")));
}

#[test]
fn steep_decay_rate_is_warning() {
    let mut config = SimConfig::default();
    config.decay.sleep_quality = 0.2;
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.iter().any(|w| w.field == "decay.sleep_quality"));
}

#[test]
fn misordered_nutrition_is_warning() {
    let mut config = SimConfig::default();
    config.nutrition.enhanced = 1.3;
    let (_, warnings) = validate_physical_ranges(&config);
    assert!(warnings.iter().any(|w| w.field == "nutrition"));
}

#[test]
fn all_defaults_pass_validation() {
    let config = SimConfig::default();
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty(), "Default config should have 0 range errors: {errors:?}");
    assert!(
        warnings.is_empty(),
        "Default config should have 0 range warnings: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
    assert!(config.validate().is_ok());
}

// ============================================================================
// Roundtrip
// ============================================================================

#[test]
fn config_roundtrip_preserves_values() {
    let mut original = SimConfig::default();
    original.simulation.sample_interval_days = 3;
    original.destinations.lunar.isolation_factor = 0.95;
    original.recommendation.top_k = 4;

    let toml_str = original.to_toml().expect("Serialization should work");
    let roundtripped = SimConfig::from_toml_str(&toml_str).expect("Roundtrip should validate");
    assert_eq!(roundtripped, original);
}

// ============================================================================
// validate() integration
// ============================================================================

#[test]
fn validate_collects_every_error() {
    let mut config = SimConfig::default();
    config.simulation.sample_interval_days = 0;
    config.recommendation.top_k = 0;
    config.decay.muscle_mass = -1.0;

    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3, "{errors:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn validate_rejects_stronger_light_than_moderate() {
    let mut config = SimConfig::default();
    config.countermeasures.light.cardiovascular = 0.3;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("countermeasures.moderate.cardiovascular"));
}

#[test]
fn from_toml_str_rejects_bad_weights() {
    let toml_str = r#"
[recommendation]
benefit_weight = 0.9
severity_weight = 0.9
category_weight = 0.9
"#;
    assert!(matches!(
        SimConfig::from_toml_str(toml_str),
        Err(ConfigError::Validation(_))
    ));
}
