//! Orchestrator boundary: the decision strategy behind the pipeline.
//!
//! An orchestrator maps one conjunction plus context to a final-status
//! string. Implementations range from the scripted state machine below to
//! a generative-orchestration service; their entry-point contracts differ,
//! which is why the wrapper in [`super::invoke`] probes several calling
//! conventions.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::domain::ConjunctionRecord;
use crate::memory::MemoryBank;
use crate::physics::{self, RiskLevel};

/// Final status text for a low-risk conjunction
pub const STATUS_MONITOR: &str = "MONITOR - LOW RISK";

/// Final status text for an approved maneuver
pub const STATUS_EXECUTE: &str = "EXECUTE";

/// Final status text for a rejected maneuver
pub const STATUS_REJECT: &str = "REJECT";

/// Result object returned by an orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorReply {
    /// Free-form status text; the driver matches on the EXECUTE substring
    pub text: String,
}

impl OrchestratorReply {
    /// Wrap a status string
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Per-attempt failure inside the invocation wrapper
#[derive(Debug, Clone, Error)]
pub enum OrchestratorError {
    /// The orchestrator's entry point does not accept this calling
    /// convention (the parameter-mismatch case; the wrapper advances
    /// silently)
    #[error("calling convention '{convention}' not accepted")]
    UnsupportedConvention { convention: &'static str },

    /// The orchestrator accepted the call but failed while deciding
    /// (the wrapper warns and advances)
    #[error("orchestrator failure: {0}")]
    Failed(String),
}

/// A calling convention the wrapper may attempt, most-specific first.
///
/// These mirror the entry-point shapes observed across heterogeneous
/// orchestrator implementations: some take the full message list, some a
/// single prompt, some named handles, some nothing at all.
#[derive(Debug)]
pub enum Invocation<'a> {
    /// The full positional message list
    MessageList(&'a [String]),

    /// The first message alone
    SingleMessage(&'a str),

    /// Named handles for whichever of CDM/memory are available
    Named {
        cdm: Option<&'a ConjunctionRecord>,
        memory: Option<&'a MemoryBank>,
    },

    /// No arguments at all
    NoArgs,

    /// First message combined with the memory handle
    MessageWithMemory {
        message: &'a str,
        memory: &'a MemoryBank,
    },

    /// Bindings derived from the orchestrator's declared parameter names
    Inspected { bindings: Vec<Binding<'a>> },
}

impl Invocation<'_> {
    /// Short name of the convention, for logging
    pub fn convention(&self) -> &'static str {
        match self {
            Self::MessageList(_) => "message_list",
            Self::SingleMessage(_) => "single_message",
            Self::Named { .. } => "named_cdm_memory",
            Self::NoArgs => "no_args",
            Self::MessageWithMemory { .. } => "message_with_memory",
            Self::Inspected { .. } => "inspected",
        }
    }
}

/// One parameter binding in the introspection-derived convention
#[derive(Debug)]
pub struct Binding<'a> {
    /// Declared parameter name the value was matched to
    pub name: &'static str,

    /// Bound value
    pub value: BindingValue<'a>,
}

/// Values the introspection candidate can bind
#[derive(Debug)]
pub enum BindingValue<'a> {
    Message(&'a str),
    Cdm(&'a ConjunctionRecord),
    Memory(&'a MemoryBank),
}

/// A decision strategy mapping a conjunction plus context to a final
/// status
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Human-readable orchestrator name
    fn name(&self) -> &str;

    /// Parameter names declared by the orchestrator's entry point,
    /// matched against a synonym set by the introspection candidate
    fn parameter_names(&self) -> &[&str];

    /// Attempt one calling convention
    async fn call(
        &self,
        invocation: Invocation<'_>,
    ) -> Result<OrchestratorReply, OrchestratorError>;
}

/// The default orchestrator: an explicit triage → plan → safety state
/// machine over the stage functions.
///
/// Accepts only the named convention with a CDM present, so the wrapper's
/// fallback sequence is exercised on every production call.
pub struct ScriptedOrchestrator;

impl Default for ScriptedOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOrchestrator {
    /// Create the scripted orchestrator
    pub fn new() -> Self {
        Self
    }

    /// Run the decision state machine for one conjunction
    fn decide(&self, cdm: &ConjunctionRecord) -> OrchestratorReply {
        let assessment = physics::assess(cdm.miss_distance_km, cdm.covariance_eigenvalue);
        debug!(
            cdm_id = cdm.id,
            pc = assessment.pc,
            risk = %assessment.risk_level,
            "Triage complete"
        );

        if assessment.risk_level == RiskLevel::Low {
            return OrchestratorReply::new(STATUS_MONITOR);
        }

        let plan = physics::optimize(cdm.miss_distance_km);
        debug!(
            cdm_id = cdm.id,
            delta_v_kms = plan.delta_v_kms,
            fuel_cost_percent = plan.fuel_cost_percent,
            "Maneuver planned"
        );

        let verdict = physics::validate(plan.delta_v_kms, plan.new_perigee_km);
        if verdict.approved_for_execution {
            OrchestratorReply::new(STATUS_EXECUTE)
        } else {
            OrchestratorReply::new(STATUS_REJECT)
        }
    }
}

#[async_trait]
impl Orchestrator for ScriptedOrchestrator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn parameter_names(&self) -> &[&str] {
        &["cdm", "memory_bank"]
    }

    async fn call(
        &self,
        invocation: Invocation<'_>,
    ) -> Result<OrchestratorReply, OrchestratorError> {
        match invocation {
            Invocation::Named { cdm: Some(cdm), .. } => Ok(self.decide(cdm)),
            other => Err(OrchestratorError::UnsupportedConvention {
                convention: other.convention(),
            }),
        }
    }
}
