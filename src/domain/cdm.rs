//! Conjunction Data Message records.
//!
//! A CDM describes a predicted close approach between two orbiting
//! objects. Batches are either generated for demo runs or loaded from a
//! JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Simplified Conjunction Data Message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConjunctionRecord {
    /// CDM identifier
    pub id: u64,

    /// Minimum predicted distance between the two objects, km
    pub miss_distance_km: f64,

    /// Largest eigenvalue of the combined position covariance,
    /// a proxy for positional uncertainty
    pub covariance_eigenvalue: f64,

    /// Current perigee of the protected asset, km
    pub perigee_km: f64,

    /// Epoch of the predicted close approach
    pub epoch: DateTime<Utc>,
}

impl ConjunctionRecord {
    /// A realistic high-risk test CDM
    pub fn example() -> Self {
        Self {
            id: 54321,
            miss_distance_km: 0.08,
            covariance_eigenvalue: 0.6,
            perigee_km: 450.0,
            epoch: Utc::now(),
        }
    }

    /// Generate a demo batch of `count` CDMs.
    ///
    /// Record `i` gets a distinct id and a miss distance shrinking by
    /// 10 m per record, so every record in a small batch triages as
    /// high risk.
    pub fn example_batch(count: usize) -> Vec<Self> {
        (0..count)
            .map(|i| {
                let mut cdm = Self::example();
                cdm.id += i as u64;
                cdm.miss_distance_km = (0.08 - 0.01 * i as f64).max(0.0);
                cdm
            })
            .collect()
    }

    /// Load a batch from a JSON file containing an array of records
    pub fn load_batch(path: &Path) -> Result<Vec<Self>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CDM batch file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse CDM batch file: {}", path.display()))
    }

    /// The task text handed to the orchestrator for this CDM
    pub fn task_text(&self) -> String {
        format!(
            "Process CDM ID {}. Current Data: Miss Distance: {:.3} km, \
             Covariance: {}, Current Perigee: {} km. Coordinate the full \
             collision avoidance workflow and report the final action.",
            self.id, self.miss_distance_km, self.covariance_eigenvalue, self.perigee_km
        )
    }
}
