//! System-wide default constants and the deployment environment profile.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Environment
// ============================================================================

/// Environment variable selecting the deployment profile.
pub const ENVIRONMENT_ENV_VAR: &str = "AHSE_ENV";

/// Environment variable naming an intervention table to load.
pub const INTERVENTIONS_ENV_VAR: &str = "AHSE_INTERVENTIONS";

/// Deployment profile. Only affects the default log level; model constants
/// come from `SimConfig` in every profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Read `AHSE_ENV`. Unknown or missing values select development.
    pub fn from_env() -> Self {
        std::env::var(ENVIRONMENT_ENV_VAR)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "warn",
            Environment::Testing => "error",
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Number of trajectory rows printed in the text report (evenly spaced).
pub const REPORT_TRAJECTORY_ROWS: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" Testing "), Environment::Testing);
        assert_eq!(Environment::parse("staging"), Environment::Development);
        assert_eq!(Environment::Production.default_log_filter(), "warn");
    }
}
