//! Reporting boundary.
//!
//! Consumes the per-CDM result rows in processing order and produces
//! artifacts for downstream visualization. Reporting is best-effort: the
//! caller logs failures and never lets them affect a completed run.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::domain::ResultRecord;
use crate::physics::RiskLevel;

/// Number of histogram buckets in the Pc distribution artifact
const PC_HISTOGRAM_BINS: usize = 10;

/// An external report/visualization collaborator
pub trait Reporter {
    /// Human-readable reporter name
    fn name(&self) -> &str;

    /// Produce artifacts from the result rows
    fn generate(&self, results: &[ResultRecord]) -> Result<()>;
}

/// Pc histogram artifact
#[derive(Debug, Serialize)]
struct PcDistribution {
    bin_edges: Vec<f64>,
    counts: Vec<u64>,
}

/// Per-CDM delta-v and risk series artifact
#[derive(Debug, Serialize)]
struct PipelineSummary {
    delta_v_kms: Vec<f64>,
    risk_levels: Vec<RiskLevel>,
}

/// Writes report artifacts as JSON files into an output directory
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a reporter targeting `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn write_artifact<T: Serialize>(&self, filename: &str, artifact: &T) -> Result<()> {
        let path = self.output_dir.join(filename);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report artifact: {}", path.display()))?;

        serde_json::to_writer_pretty(file, artifact)
            .with_context(|| format!("Failed to write report artifact: {}", path.display()))
    }

    fn pc_distribution(&self, results: &[ResultRecord]) -> Option<PcDistribution> {
        let pcs: Vec<f64> = results
            .iter()
            .map(|r| r.calculated_pc)
            .filter(|pc| *pc > 0.0)
            .collect();

        if pcs.is_empty() {
            return None;
        }

        let min = pcs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = pcs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let width = ((max - min) / PC_HISTOGRAM_BINS as f64).max(f64::MIN_POSITIVE);

        let mut counts = vec![0u64; PC_HISTOGRAM_BINS];
        for pc in &pcs {
            let bin = (((pc - min) / width) as usize).min(PC_HISTOGRAM_BINS - 1);
            counts[bin] += 1;
        }

        let bin_edges = (0..=PC_HISTOGRAM_BINS)
            .map(|i| min + width * i as f64)
            .collect();

        Some(PcDistribution { bin_edges, counts })
    }
}

impl Reporter for JsonReporter {
    fn name(&self) -> &str {
        "json"
    }

    fn generate(&self, results: &[ResultRecord]) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create report output directory: {}",
                self.output_dir.display()
            )
        })?;

        if let Some(distribution) = self.pc_distribution(results) {
            self.write_artifact("pc_distribution.json", &distribution)?;
        }

        let summary = PipelineSummary {
            delta_v_kms: results.iter().map(|r| r.delta_v_kms).collect(),
            risk_levels: results.iter().map(|r| r.risk_level).collect(),
        };
        self.write_artifact("pipeline_summary.json", &summary)?;

        info!(output_dir = %self.output_dir.display(), "Report artifacts written");
        Ok(())
    }
}

/// Hand results to a reporter, logging failure instead of propagating it.
/// Reporting never affects the exit status of a completed run.
pub fn generate_non_fatal(reporter: &dyn Reporter, results: &[ResultRecord]) {
    if let Err(e) = reporter.generate(results) {
        tracing::error!(reporter = reporter.name(), error = %e, "Report generation failed");
    }
}
