//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::SimConfig;
use crate::types::{CountermeasureRegimen, Destination, HealthMetric};

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

const DECAY_KEYS: &[&str] = &[
    "muscle_mass",
    "bone_density",
    "cardiovascular_fitness",
    "immune_function",
    "cognitive_performance",
    "radiation_dna_damage",
    "stress_level",
    "sleep_quality",
    "dna_damage_per_msv",
];

const DESTINATION_FIELDS: &[&str] = &["gravity_factor", "isolation_factor"];

const MITIGATION_FIELDS: &[&str] = &[
    "musculoskeletal",
    "cardiovascular",
    "neurobehavioral",
    "immune",
];

/// Returns the complete set of valid dotted key paths for SimConfig.
///
/// Kept in step with the struct hierarchy in sim_config.rs. Table-valued
/// sections are generated from the destination and regimen enums.
pub fn known_config_keys() -> HashSet<String> {
    let mut keys: HashSet<String> = [
        // [simulation]
        "simulation",
        "simulation.sample_interval_days",
        "simulation.max_simulation_days",
        // [decay]
        "decay",
        // [destinations]
        "destinations",
        // [countermeasures]
        "countermeasures",
        // [nutrition]
        "nutrition",
        "nutrition.restricted",
        "nutrition.standard",
        "nutrition.enhanced",
        // [recommendation]
        "recommendation",
        "recommendation.top_k",
        "recommendation.benefit_weight",
        "recommendation.severity_weight",
        "recommendation.category_weight",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect();

    keys.extend(DECAY_KEYS.iter().map(|k| format!("decay.{k}")));

    for dest in Destination::ALL {
        keys.insert(format!("destinations.{}", dest.key()));
        for field in DESTINATION_FIELDS {
            keys.insert(format!("destinations.{}.{field}", dest.key()));
        }
    }

    for regimen in [
        CountermeasureRegimen::None,
        CountermeasureRegimen::Light,
        CountermeasureRegimen::Moderate,
        CountermeasureRegimen::Intensive,
    ] {
        keys.insert(format!("countermeasures.{}", regimen.key()));
        for field in MITIGATION_FIELDS {
            keys.insert(format!("countermeasures.{}.{field}", regimen.key()));
        }
    }

    keys
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, dist)| *dist <= 3)
        // Tie-break on the key so suggestions don't depend on hash order
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.clone())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys. It only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let mut warnings = Vec::new();

    for key in walk_toml_keys(&value, "") {
        if !known.contains(&key) {
            let suggestion = suggest_correction(&key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key,
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Largest per-day decay rate that still looks like a physiological model.
const SUSPICIOUS_DECAY_RATE: f64 = 0.05;

/// Validate physical ranges on a parsed SimConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent a run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(config: &SimConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Decay rates: finite, non-negative. Negative rates would model recovery.
    for metric in HealthMetric::ALL {
        let rate = config.decay.rate(metric);
        if !rate.is_finite() || rate < 0.0 {
            errors.push(format!(
                "decay.{} = {rate} must be a finite rate >= 0",
                metric.key()
            ));
        } else if rate > SUSPICIOUS_DECAY_RATE {
            warnings.push(ValidationWarning {
                field: format!("decay.{}", metric.key()),
                message: format!(
                    "decay.{} = {rate:.4}/day would reach the harmful limit within weeks",
                    metric.key()
                ),
                suggestion: None,
            });
        }
    }
    let per_msv = config.decay.dna_damage_per_msv;
    if !per_msv.is_finite() || per_msv < 0.0 {
        errors.push(format!(
            "decay.dna_damage_per_msv = {per_msv} must be a finite rate >= 0"
        ));
    }

    // Destination factors: strictly positive multipliers
    for dest in Destination::ALL {
        let f = config.destination(dest);
        for (field, value) in [
            ("gravity_factor", f.gravity_factor),
            ("isolation_factor", f.isolation_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!(
                    "destinations.{}.{field} = {value} must be > 0",
                    dest.key()
                ));
            } else if value > 2.0 {
                warnings.push(ValidationWarning {
                    field: format!("destinations.{}.{field}", dest.key()),
                    message: format!(
                        "destinations.{}.{field} = {value:.2} more than doubles the microgravity rate",
                        dest.key()
                    ),
                    suggestion: None,
                });
            }
        }
    }

    // Mitigation factors: (0, 1]. Zero would freeze decay entirely.
    for (name, m) in [
        ("none", &config.countermeasures.none),
        ("light", &config.countermeasures.light),
        ("moderate", &config.countermeasures.moderate),
        ("intensive", &config.countermeasures.intensive),
    ] {
        for (field, value) in [
            ("musculoskeletal", m.musculoskeletal),
            ("cardiovascular", m.cardiovascular),
            ("neurobehavioral", m.neurobehavioral),
            ("immune", m.immune),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(format!(
                    "countermeasures.{name}.{field} = {value} must be within (0, 1]"
                ));
            }
        }
    }

    // Nutrition multipliers
    let n = &config.nutrition;
    for (field, value) in [
        ("restricted", n.restricted),
        ("standard", n.standard),
        ("enhanced", n.enhanced),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("nutrition.{field} = {value} must be > 0"));
        }
    }
    if n.restricted < n.standard || n.enhanced > n.standard {
        warnings.push(ValidationWarning {
            field: "nutrition".to_string(),
            message: format!(
                "nutrition multipliers are not ordered restricted >= standard >= enhanced ({:.2}, {:.2}, {:.2})",
                n.restricted, n.standard, n.enhanced
            ),
            suggestion: None,
        });
    }

    // Score weights cannot be negative
    let r = &config.recommendation;
    for (field, value) in [
        ("benefit_weight", r.benefit_weight),
        ("severity_weight", r.severity_weight),
        ("category_weight", r.category_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("recommendation.{field} = {value} must be >= 0"));
        }
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
