//! Pipeline observability: tracing and metrics.
//!
//! The recorder keeps an append-only trace of pipeline steps plus a table
//! of monotonically increasing counters, and snapshots both into a final
//! report. One recorder per batch run; no globals.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Total CDMs processed, incremented once per CDM
pub const METRIC_CDM_PROCESSED: &str = "cdm_processed";

/// Total maneuvers executed, incremented iff the final status
/// reports execution
pub const METRIC_MANEUVERS_EXECUTED: &str = "maneuvers_executed";

/// One logged pipeline step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// When the step was recorded
    pub timestamp: DateTime<Utc>,

    /// Component that performed the step
    pub agent: String,

    /// Short step name
    pub step: String,

    /// Structured step context
    pub payload: serde_json::Value,
}

/// Snapshot of the recorder state at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Counter table, metric name to value
    pub metrics: BTreeMap<String, u64>,

    /// All trace entries in append order
    pub trace: Vec<TraceEntry>,
}

/// Append-only trace log and counter table for one batch run
#[derive(Debug)]
pub struct Recorder {
    trace: Vec<TraceEntry>,
    metrics: BTreeMap<String, u64>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Create a recorder with the standard counters pre-seeded at zero
    pub fn new() -> Self {
        let mut metrics = BTreeMap::new();
        metrics.insert(METRIC_CDM_PROCESSED.to_string(), 0);
        metrics.insert(METRIC_MANEUVERS_EXECUTED.to_string(), 0);

        Self {
            trace: Vec::new(),
            metrics,
        }
    }

    /// Record a pipeline step
    pub fn log_trace(&mut self, agent: &str, step: &str, payload: serde_json::Value) {
        info!(agent, step, "TRACE");
        self.trace.push(TraceEntry {
            timestamp: Utc::now(),
            agent: agent.to_string(),
            step: step.to_string(),
            payload,
        });
    }

    /// Increment a counter by one, creating it if absent
    pub fn log_metric(&mut self, key: &str) {
        self.log_metric_by(key, 1);
    }

    /// Increment a counter by `value`, creating it if absent
    pub fn log_metric_by(&mut self, key: &str, value: u64) {
        *self.metrics.entry(key.to_string()).or_insert(0) += value;
    }

    /// Current value of a counter (0 if never incremented)
    pub fn metric(&self, key: &str) -> u64 {
        self.metrics.get(key).copied().unwrap_or(0)
    }

    /// Number of trace entries recorded so far
    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }

    /// Snapshot the current metrics and trace
    pub fn pipeline_report(&self) -> PipelineReport {
        PipelineReport {
            metrics: self.metrics.clone(),
            trace: self.trace.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_counters_seeded() {
        let recorder = Recorder::new();
        assert_eq!(recorder.metric(METRIC_CDM_PROCESSED), 0);
        assert_eq!(recorder.metric(METRIC_MANEUVERS_EXECUTED), 0);
    }

    #[test]
    fn test_unknown_counter_created_on_increment() {
        let mut recorder = Recorder::new();
        assert_eq!(recorder.metric("fallbacks"), 0);

        recorder.log_metric("fallbacks");
        recorder.log_metric_by("fallbacks", 2);
        assert_eq!(recorder.metric("fallbacks"), 3);
    }

    #[test]
    fn test_trace_appends_in_order() {
        let mut recorder = Recorder::new();
        recorder.log_trace("driver", "cdm_received", json!({"cdm_id": 1}));
        recorder.log_trace("driver", "cdm_received", json!({"cdm_id": 2}));

        let report = recorder.pipeline_report();
        assert_eq!(report.trace.len(), 2);
        assert_eq!(report.trace[0].payload["cdm_id"], 1);
        assert_eq!(report.trace[1].payload["cdm_id"], 2);
    }

    #[test]
    fn test_report_snapshot_idempotent() {
        let mut recorder = Recorder::new();
        recorder.log_trace("driver", "cdm_received", json!({"cdm_id": 1}));
        recorder.log_metric(METRIC_CDM_PROCESSED);

        let first = recorder.pipeline_report();
        let second = recorder.pipeline_report();

        assert_eq!(first.metrics, second.metrics);
        assert_eq!(first.trace.len(), second.trace.len());
        assert_eq!(first, second);
    }
}
