//! Command-line interface for sentinel.
//!
//! Provides commands for running a CDM batch through the decision
//! pipeline and inspecting the resolved configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::SentinelConfig;
use crate::core::{PipelineDriver, ScriptedOrchestrator};
use crate::domain::ConjunctionRecord;
use crate::observability::{METRIC_CDM_PROCESSED, METRIC_MANEUVERS_EXECUTED};
use crate::report::{self, JsonReporter};

/// sentinel - Conjunction assessment decision pipeline
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a batch of Conjunction Data Messages
    Run {
        /// Batch file (JSON array of CDMs); a demo batch is generated
        /// if not provided
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of demo CDMs to generate (ignored with --input)
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run { input, count } => run_batch(input, count).await,
            Commands::Config => show_config(),
        }
    }
}

async fn run_batch(input: Option<PathBuf>, count: Option<usize>) -> Result<()> {
    let config = SentinelConfig::load()?;

    // Precondition: the credential gate aborts the whole run before any
    // CDM is processed
    config.ensure_credential()?;

    let cdms = match input {
        Some(path) => ConjunctionRecord::load_batch(&path)?,
        None => ConjunctionRecord::example_batch(count.unwrap_or(config.batch_size)),
    };

    info!(batch = cdms.len(), "Sentinel system: starting pipeline run");

    let mut driver = PipelineDriver::new(Box::new(ScriptedOrchestrator::new()));
    let batch = driver.run_batch(&cdms).await?;

    for outcome in &batch.outcomes {
        println!(
            "CDM {} -> {} (pc {:.2e}, delta-v {:.6} km/s)",
            outcome.cdm_id, outcome.final_status, outcome.calculated_pc, outcome.delta_v_kms
        );
    }

    println!();
    println!(
        "Total CDMs processed:     {}",
        batch.observability.metrics[METRIC_CDM_PROCESSED]
    );
    println!(
        "Total maneuvers executed: {}",
        batch.observability.metrics[METRIC_MANEUVERS_EXECUTED]
    );

    // Reporting is best-effort; a failure here never fails the run
    let reporter = JsonReporter::new(&config.output_dir);
    report::generate_non_fatal(&reporter, &batch.results);

    Ok(())
}

fn show_config() -> Result<()> {
    let config = SentinelConfig::load()?;

    println!("output_dir:         {}", config.output_dir.display());
    println!("batch_size:         {}", config.batch_size);
    println!("require_credential: {}", config.require_credential);
    println!("credential_env:     {}", config.credential_env);

    Ok(())
}
