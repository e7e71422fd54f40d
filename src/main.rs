//! AHSE - Astronaut Health Simulation Engine
//!
//! Projects crew health over a mission, scores risk, and recommends a
//! phased countermeasure plan.
//!
//! ## Usage
//!
//! ```bash
//! # Reference astronaut on the reference Mars transit
//! ahse simulate
//!
//! # Whole crew from a scenario file, machine-readable output
//! ahse simulate --scenario crew.toml --format json --output report.json
//!
//! # Custom model constants and intervention table
//! ahse --config ahse.toml --interventions interventions.toml simulate
//!
//! # Inspect the active intervention table
//! ahse interventions
//!
//! # Validate a config file, or write the defaults as a starting point
//! ahse check-config ahse.toml
//! ahse check-config --write-defaults ahse.toml
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log level filter (overrides the AHSE_ENV default)
//! - `AHSE_ENV`: development | production | testing
//! - `AHSE_CONFIG`: Path to the model constants TOML
//! - `AHSE_INTERVENTIONS`: Path to the intervention table TOML

use std::path::{Path, PathBuf};

use ahse::config::{self, Environment, SimConfig};
use ahse::pipeline::report::render_text;
use ahse::{run_crew, InterventionTable, PipelineContext, PipelineReport, Scenario};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "ahse")]
#[command(about = "Astronaut health trajectory projection and countermeasure planning")]
#[command(version)]
struct CliArgs {
    /// Model constants TOML (default: $AHSE_CONFIG, then ./ahse.toml, then built-in)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Intervention table TOML (default: $AHSE_INTERVENTIONS, then built-in)
    #[arg(long, global = true)]
    interventions: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Project health, score risk, and recommend interventions
    Simulate {
        /// Scenario TOML with a [mission] table and [[astronauts]] entries
        #[arg(long)]
        scenario: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Override recommendation.top_k from the config
        #[arg(long)]
        top_k: Option<usize>,

        /// Skip the phased mission plan
        #[arg(long)]
        no_plan: bool,

        /// Write the report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List the active intervention table
    Interventions {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate a config file (or the one the search order finds)
    CheckConfig {
        path: Option<PathBuf>,

        /// Write the built-in defaults to this path and exit
        #[arg(long, conflicts_with = "path")]
        write_defaults: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON output wrapper for `simulate --format json`.
#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    engine_version: &'static str,
    intervention_table: &'a str,
    reports: Vec<&'a PipelineReport>,
    failures: Vec<Failure>,
}

#[derive(Serialize)]
struct Failure {
    astronaut: String,
    error: String,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    match args.command {
        SubCommand::Simulate {
            scenario,
            format,
            top_k,
            no_plan,
            output,
        } => {
            let mut sim_config = load_config(args.config.as_deref())?;
            if let Some(k) = top_k {
                sim_config.recommendation.top_k = k;
                sim_config
                    .validate()
                    .context("--top-k produced an invalid configuration")?;
            }
            let table = InterventionTable::load(args.interventions.as_deref())
                .context("failed to load intervention table")?;
            let scenario = match scenario {
                Some(path) => Scenario::load_from_file(&path)?,
                None => {
                    info!("No scenario given, using the reference astronaut and mission");
                    Scenario::sample()
                }
            };
            let ctx = PipelineContext::new(sim_config, table).with_plan(!no_plan);
            run_simulate(&scenario, &ctx, format, output.as_deref())
        }
        SubCommand::Interventions { format } => {
            let table = InterventionTable::load(args.interventions.as_deref())
                .context("failed to load intervention table")?;
            print_interventions(&table, format)
        }
        SubCommand::CheckConfig {
            path,
            write_defaults,
        } => check_config(path.or(args.config), write_defaults),
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(Environment::from_env().default_log_filter())
    });

    // Reports go to stdout; keep logs on stderr.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(p) => SimConfig::load_from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(SimConfig::load()),
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_simulate(
    scenario: &Scenario,
    ctx: &PipelineContext,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    info!(
        mission = %scenario.mission.name(),
        crew = scenario.astronauts.len(),
        days = scenario.mission.duration_days(),
        "Running simulation"
    );

    let results = run_crew(&scenario.astronauts, &scenario.mission, ctx);

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (profile, result) in scenario.astronauts.iter().zip(&results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(astronaut = %profile.name, error = %e, "Projection failed");
                failures.push(Failure {
                    astronaut: profile.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let failed = failures.len();
    let rendered = match format {
        OutputFormat::Text => {
            let mut blocks: Vec<String> = reports.iter().map(|r| render_text(r)).collect();
            for f in &failures {
                blocks.push(format!("!! {}: {}", f.astronaut, f.error));
            }
            blocks.join("\n\n")
        }
        OutputFormat::Json => serde_json::to_string_pretty(&ReportEnvelope {
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION"),
            intervention_table: &ctx.engine.table().version,
            reports,
            failures,
        })?,
    };

    emit(&rendered, output)?;

    if failed > 0 {
        anyhow::bail!(
            "{} of {} projections failed",
            failed,
            scenario.astronauts.len()
        );
    }
    Ok(())
}

fn print_interventions(table: &InterventionTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table)?);
        }
        OutputFormat::Text => {
            println!("Intervention table {} ({} entries)", table.version, table.len());
            for intervention in &table.interventions {
                let targets: Vec<&str> = intervention.targets.iter().map(|m| m.key()).collect();
                println!(
                    "  {:<40} {:<10} benefit {:.2}  {:<14} {}{}",
                    intervention.name,
                    intervention.category.to_string(),
                    intervention.benefit,
                    intervention.phase.to_string(),
                    targets.join(","),
                    if intervention.maintenance { "  [maintenance]" } else { "" },
                );
            }
        }
    }
    Ok(())
}

fn check_config(path: Option<PathBuf>, write_defaults: Option<PathBuf>) -> Result<()> {
    if let Some(target) = write_defaults {
        SimConfig::default()
            .save_to_file(&target)
            .with_context(|| format!("failed to write defaults to {}", target.display()))?;
        println!("Wrote default model constants to {}", target.display());
        return Ok(());
    }

    match path {
        Some(p) => {
            SimConfig::load_from_file(&p)?;
            println!("{}: OK", p.display());
        }
        None => {
            let local = PathBuf::from(config::LOCAL_CONFIG_FILE);
            let env_path = std::env::var(config::CONFIG_ENV_VAR).ok().map(PathBuf::from);
            match env_path.filter(|p| p.exists()).or(local.exists().then_some(local)) {
                Some(p) => {
                    SimConfig::load_from_file(&p)?;
                    println!("{}: OK", p.display());
                }
                None => println!("No config file found; built-in defaults are valid"),
            }
        }
    }
    Ok(())
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
