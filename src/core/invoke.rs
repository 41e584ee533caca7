//! Invocation-resilience wrapper for orchestrators.
//!
//! An orchestrator's entry-point contract is not statically guaranteed:
//! one implementation takes the message list, another a single prompt,
//! another named handles. The wrapper builds an ordered list of candidate
//! calling conventions, most-specific first, and returns the first
//! success. Attempts are strictly sequential; a failed candidate is
//! assumed to have had no side effects.

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ConjunctionRecord;
use crate::memory::MemoryBank;

use super::orchestrator::{
    Binding, BindingValue, Invocation, Orchestrator, OrchestratorError, OrchestratorReply,
};

/// Parameter names recognized as the message slot by the introspection
/// candidate
const MESSAGE_SYNONYMS: [&str; 3] = ["messages", "prompts", "prompt"];

/// Parameter name recognized as the memory slot
const MEMORY_PARAM: &str = "memory_bank";

/// Failure of an entire invocation, after every candidate was attempted
#[derive(Debug, Error)]
pub enum InvocationError {
    /// Every candidate convention failed; carries the last observed
    /// failure
    #[error("all calling conventions exhausted; last failure: {last}")]
    Exhausted { last: String },

    /// No candidate even produced a failure to report
    #[error("unable to call orchestrator '{name}' with any candidate convention")]
    NoFailureObserved { name: String },
}

/// Everything the driver can offer an orchestrator for one call
#[derive(Debug, Clone, Copy)]
pub struct InvocationRequest<'a> {
    /// Positional task messages
    pub messages: &'a [String],

    /// Current conjunction, if available
    pub cdm: Option<&'a ConjunctionRecord>,

    /// Strategy memory handle, if available
    pub memory: Option<&'a MemoryBank>,
}

/// Call an orchestrator, probing calling conventions until one succeeds.
///
/// A parameter-mismatch failure advances silently to the next candidate;
/// any other failure is surfaced as a warning and also advances, to
/// maximize the chance of eventual success. No retry delays, no parallel
/// candidates, no per-call deadline.
pub async fn invoke(
    orchestrator: &dyn Orchestrator,
    request: InvocationRequest<'_>,
) -> Result<OrchestratorReply, InvocationError> {
    let candidates = build_candidates(orchestrator, &request);
    let mut last_failure: Option<OrchestratorError> = None;

    for candidate in candidates {
        let convention = candidate.convention();
        debug!(
            orchestrator = orchestrator.name(),
            convention, "Attempting invocation convention"
        );

        match orchestrator.call(candidate).await {
            Ok(reply) => return Ok(reply),
            Err(e @ OrchestratorError::UnsupportedConvention { .. }) => {
                debug!(convention, error = %e, "Convention not accepted");
                last_failure = Some(e);
            }
            Err(e) => {
                warn!(convention, error = %e, "Invocation attempt raised");
                last_failure = Some(e);
            }
        }
    }

    match last_failure {
        Some(e) => Err(InvocationError::Exhausted {
            last: e.to_string(),
        }),
        None => Err(InvocationError::NoFailureObserved {
            name: orchestrator.name().to_string(),
        }),
    }
}

/// Build the ordered candidate list for one request
fn build_candidates<'a>(
    orchestrator: &dyn Orchestrator,
    request: &InvocationRequest<'a>,
) -> Vec<Invocation<'a>> {
    let mut candidates = Vec::new();

    // 1. Positional message list, as given
    candidates.push(Invocation::MessageList(request.messages));

    // 2. First positional message alone
    if let Some(first) = request.messages.first() {
        candidates.push(Invocation::SingleMessage(first.as_str()));
    }

    // 3. Named handles, if either is available
    if request.cdm.is_some() || request.memory.is_some() {
        candidates.push(Invocation::Named {
            cdm: request.cdm,
            memory: request.memory,
        });
    }

    // 4. No arguments
    candidates.push(Invocation::NoArgs);

    // 5. First message plus the memory handle
    if let (Some(first), Some(memory)) = (request.messages.first(), request.memory) {
        candidates.push(Invocation::MessageWithMemory {
            message: first.as_str(),
            memory,
        });
    }

    // 6. Bindings matched against the orchestrator's declared parameters
    if let Some(inspected) = build_inspected(orchestrator, request) {
        candidates.push(inspected);
    }

    candidates
}

/// Derive the introspection candidate by matching the orchestrator's
/// declared parameter names against the synonym set
fn build_inspected<'a>(
    orchestrator: &dyn Orchestrator,
    request: &InvocationRequest<'a>,
) -> Option<Invocation<'a>> {
    let params = orchestrator.parameter_names();
    let mut bindings = Vec::new();

    if let Some(name) = MESSAGE_SYNONYMS.into_iter().find(|s| params.contains(s)) {
        // Bind the first message, falling back to the CDM handle
        match (request.messages.first(), request.cdm) {
            (Some(first), _) => bindings.push(Binding {
                name,
                value: BindingValue::Message(first.as_str()),
            }),
            (None, Some(cdm)) => bindings.push(Binding {
                name,
                value: BindingValue::Cdm(cdm),
            }),
            (None, None) => {}
        }
    }

    if params.contains(&MEMORY_PARAM) {
        if let Some(memory) = request.memory {
            bindings.push(Binding {
                name: MEMORY_PARAM,
                value: BindingValue::Memory(memory),
            });
        }
    }

    if bindings.is_empty() {
        None
    } else {
        Some(Invocation::Inspected { bindings })
    }
}
