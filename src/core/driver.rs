//! Pipeline driver: the per-CDM batch loop.
//!
//! The driver walks a batch of conjunctions strictly sequentially, invokes
//! the orchestrator for each through the resilience wrapper, interprets
//! the status text, and keeps observability and strategy memory in step.
//! One CDM's orchestration failure never aborts the batch: the driver
//! substitutes the NO_ACTION outcome and continues.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::domain::{ConjunctionRecord, PipelineOutcome, ResultRecord};
use crate::memory::MemoryBank;
use crate::observability::{
    PipelineReport, Recorder, METRIC_CDM_PROCESSED, METRIC_MANEUVERS_EXECUTED,
};
use crate::physics::{self, RiskLevel};

use super::invoke::{invoke, InvocationRequest};
use super::orchestrator::Orchestrator;

/// Everything one batch run produced
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Unique id of this batch run
    pub run_id: Uuid,

    /// One outcome per CDM, in processing order
    pub outcomes: Vec<PipelineOutcome>,

    /// Result rows for the reporting boundary, in processing order
    pub results: Vec<ResultRecord>,

    /// Final metrics and trace snapshot
    pub observability: PipelineReport,
}

/// Drives a batch of CDMs through the decision pipeline
pub struct PipelineDriver {
    orchestrator: Box<dyn Orchestrator>,
    recorder: Recorder,
    memory: MemoryBank,
}

impl PipelineDriver {
    /// Create a driver with fresh observability and memory state
    pub fn new(orchestrator: Box<dyn Orchestrator>) -> Self {
        Self {
            orchestrator,
            recorder: Recorder::new(),
            memory: MemoryBank::new(),
        }
    }

    /// Strategy memory accumulated so far
    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    /// Observability recorder for this driver
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Process a batch of CDMs, one at a time.
    ///
    /// Every CDM yields exactly one outcome and one `cdm_processed`
    /// increment, including invocation failures (NO_ACTION fallback).
    #[instrument(skip(self, cdms), fields(orchestrator = self.orchestrator.name(), batch = cdms.len()))]
    pub async fn run_batch(&mut self, cdms: &[ConjunctionRecord]) -> Result<BatchReport> {
        let run_id = Uuid::new_v4();
        info!(%run_id, "Starting batch run");

        let mut outcomes = Vec::with_capacity(cdms.len());
        let mut results = Vec::with_capacity(cdms.len());

        for cdm in cdms {
            self.recorder
                .log_trace("driver", "cdm_received", json!({ "cdm_id": cdm.id }));

            let messages = vec![cdm.task_text()];
            info!(cdm_id = cdm.id, task = %messages[0], "Dispatching CDM");

            let outcome = match invoke(
                self.orchestrator.as_ref(),
                InvocationRequest {
                    messages: &messages,
                    cdm: Some(cdm),
                    memory: Some(&self.memory),
                },
            )
            .await
            {
                Ok(reply) => self.interpret(cdm, reply.text),
                Err(e) => {
                    error!(cdm_id = cdm.id, error = %e, "Orchestrator invocation failed");
                    let pc = physics::assess(cdm.miss_distance_km, cdm.covariance_eigenvalue).pc;
                    PipelineOutcome::no_action(cdm.id, pc)
                }
            };

            if outcome.is_execute() {
                self.memory.store_strategy(&outcome);
                self.recorder.log_metric(METRIC_MANEUVERS_EXECUTED);
            }
            self.recorder.log_metric(METRIC_CDM_PROCESSED);

            results.push(ResultRecord {
                calculated_pc: outcome.calculated_pc,
                risk_level: RiskLevel::from_pc(outcome.calculated_pc),
                delta_v_kms: outcome.delta_v_kms,
            });

            info!(cdm_id = cdm.id, status = %outcome.final_status, "Final action");
            outcomes.push(outcome);
        }

        info!(%run_id, processed = outcomes.len(), "Batch complete");

        Ok(BatchReport {
            run_id,
            outcomes,
            results,
            observability: self.recorder.pipeline_report(),
        })
    }

    /// Turn the orchestrator's status text into an outcome.
    ///
    /// Pc is recomputed from the CDM, and delta-v from the planner, so the
    /// outcome is consistent with the stage functions regardless of how
    /// verbose the status text is.
    fn interpret(&self, cdm: &ConjunctionRecord, final_status: String) -> PipelineOutcome {
        let pc = physics::assess(cdm.miss_distance_km, cdm.covariance_eigenvalue).pc;
        let executed = final_status.contains("EXECUTE");

        let delta_v_kms = if executed {
            physics::optimize(cdm.miss_distance_km).delta_v_kms
        } else {
            0.0
        };

        PipelineOutcome {
            cdm_id: cdm.id,
            final_status,
            calculated_pc: pc,
            delta_v_kms,
        }
    }
}
