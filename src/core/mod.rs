//! Core pipeline logic.
//!
//! This module contains:
//! - Orchestrator: the pluggable decision strategy and its scripted default
//! - Invoke: the calling-convention resilience wrapper
//! - Driver: the per-CDM batch loop

pub mod driver;
pub mod invoke;
pub mod orchestrator;

// Re-export commonly used types
pub use driver::{BatchReport, PipelineDriver};
pub use invoke::{invoke, InvocationError, InvocationRequest};
pub use orchestrator::{
    Binding, BindingValue, Invocation, Orchestrator, OrchestratorError, OrchestratorReply,
    ScriptedOrchestrator,
};
