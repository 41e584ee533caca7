//! Per-CDM outcomes and downstream record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::physics::RiskLevel;

/// Fallback status substituted when every orchestrator calling
/// convention fails
pub const NO_ACTION: &str = "NO_ACTION";

/// The driver's verdict for one CDM.
///
/// `final_status` is the orchestrator's free-form status text. Execution
/// is detected by substring match, not exact parsing, so an orchestrator
/// may decorate the keyword (e.g. "EXECUTE - burn at 14:02Z"). The known
/// downside is that a status like "NOT-TO-EXECUTE" also matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// CDM this outcome belongs to
    pub cdm_id: u64,

    /// Status text reported by the orchestrator
    pub final_status: String,

    /// Collision probability computed from the CDM
    pub calculated_pc: f64,

    /// Delta-v of the executed maneuver, 0 unless executed
    pub delta_v_kms: f64,
}

impl PipelineOutcome {
    /// Whether the status text reports an executed maneuver
    pub fn is_execute(&self) -> bool {
        self.final_status.contains("EXECUTE")
    }

    /// The fallback outcome for a failed invocation
    pub fn no_action(cdm_id: u64, calculated_pc: f64) -> Self {
        Self {
            cdm_id,
            final_status: NO_ACTION.to_string(),
            calculated_pc,
            delta_v_kms: 0.0,
        }
    }
}

/// An executed avoidance strategy, kept in long-term memory.
/// Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRecord {
    /// When the strategy was stored
    pub timestamp: DateTime<Utc>,

    /// Status text at execution time
    pub status: String,

    /// Delta-v of the executed maneuver, km/s
    pub delta_v_kms: f64,

    /// CDM the maneuver responded to
    pub cdm_id: u64,
}

impl StrategyRecord {
    /// Derive a strategy record from an executed outcome
    pub fn from_outcome(outcome: &PipelineOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            status: outcome.final_status.clone(),
            delta_v_kms: outcome.delta_v_kms,
            cdm_id: outcome.cdm_id,
        }
    }
}

/// One row handed to the reporting boundary, in CDM-processing order
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Collision probability computed for the CDM
    pub calculated_pc: f64,

    /// Classification derived from `calculated_pc`
    pub risk_level: RiskLevel,

    /// Delta-v of the executed maneuver, 0 unless executed
    pub delta_v_kms: f64,
}
