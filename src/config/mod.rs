//! Simulation Configuration Module
//!
//! Model constants (decay rates, destination and countermeasure factors,
//! recommendation weights) loaded from TOML, with built-in defaults matching
//! the reference model.
//!
//! ## Loading Order
//!
//! 1. `AHSE_CONFIG` environment variable (path to TOML file)
//! 2. `ahse.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! There is no global instance. Load once and pass it to each run:
//!
//! ```ignore
//! let config = SimConfig::load();
//! let run = projection::project(&profile, &mission, &config)?;
//! ```

mod sim_config;
pub mod defaults;
pub mod validation;

pub use defaults::Environment;
pub use sim_config::*;
