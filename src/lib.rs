//! sentinel - Conjunction assessment decision pipeline
//!
//! Ingests satellite Conjunction Data Messages (CDMs) and produces a
//! final operational action — MONITOR, EXECUTE, or REJECT — by chaining
//! risk assessment, maneuver optimization, and safety validation.
//!
//! # Architecture
//!
//! - A pluggable [`core::Orchestrator`] maps one CDM plus context to a
//!   final-status string; the default is a scripted triage → plan →
//!   safety state machine over the stage functions in [`physics`].
//! - Because orchestrator entry points are heterogeneous, every call
//!   goes through [`core::invoke`], which probes calling conventions in
//!   priority order and returns the first success.
//! - The [`core::PipelineDriver`] walks a batch strictly sequentially,
//!   isolates per-CDM failures behind a NO_ACTION fallback, and keeps
//!   the observability recorder and strategy memory in step.
//!
//! # Modules
//!
//! - `physics`: pure stage functions (Pc, maneuver, safety)
//! - `domain`: data structures (CDM, outcomes, strategy records)
//! - `core`: orchestrator boundary, invocation wrapper, batch driver
//! - `memory`: long-term strategy memory
//! - `observability`: trace log and metrics
//! - `report`: reporting boundary (JSON artifacts)
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run the demo batch
//! SENTINEL_API_KEY=... sentinel run
//!
//! # Run a batch from a file
//! SENTINEL_API_KEY=... sentinel run --input batch.json
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod memory;
pub mod observability;
pub mod physics;
pub mod report;

// Re-export main types at crate root for convenience
pub use core::{
    invoke, InvocationError, InvocationRequest, Orchestrator, OrchestratorReply, PipelineDriver,
    ScriptedOrchestrator,
};
pub use domain::{ConjunctionRecord, PipelineOutcome, ResultRecord, StrategyRecord};
pub use memory::MemoryBank;
pub use observability::{PipelineReport, Recorder};
