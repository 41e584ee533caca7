//! Domain types for the sentinel pipeline.
//!
//! This module contains the core data structures:
//! - ConjunctionRecord: the CDM ingested per event
//! - PipelineOutcome: the driver's per-CDM verdict
//! - StrategyRecord / ResultRecord: downstream memory and reporting rows

pub mod cdm;
pub mod outcome;

// Re-export commonly used types
pub use cdm::ConjunctionRecord;
pub use outcome::{PipelineOutcome, ResultRecord, StrategyRecord, NO_ACTION};
