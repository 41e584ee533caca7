//! Invocation Wrapper Integration Tests
//!
//! Tests for the calling-convention probing behavior: first success wins,
//! non-mismatch failures advance, exhaustion surfaces the last failure.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use sentinel::core::{
    invoke, Invocation, InvocationError, InvocationRequest, Orchestrator, OrchestratorError,
    OrchestratorReply,
};
use sentinel::{ConjunctionRecord, MemoryBank};

/// Rejects every convention before `succeed_at`, succeeds on it, and
/// counts calls
struct SucceedsAtNth {
    succeed_at: usize,
    calls: AtomicUsize,
}

impl SucceedsAtNth {
    fn new(succeed_at: usize) -> Self {
        Self {
            succeed_at,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Orchestrator for SucceedsAtNth {
    fn name(&self) -> &str {
        "succeeds_at_nth"
    }

    fn parameter_names(&self) -> &[&str] {
        &["messages", "memory_bank"]
    }

    async fn call(
        &self,
        invocation: Invocation<'_>,
    ) -> Result<OrchestratorReply, OrchestratorError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if attempt == self.succeed_at {
            Ok(OrchestratorReply::new(format!(
                "EXECUTE via {}",
                invocation.convention()
            )))
        } else {
            Err(OrchestratorError::UnsupportedConvention {
                convention: invocation.convention(),
            })
        }
    }
}

/// Fails every convention with a non-mismatch error
struct AlwaysRaises {
    calls: AtomicUsize,
}

impl AlwaysRaises {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Orchestrator for AlwaysRaises {
    fn name(&self) -> &str {
        "always_raises"
    }

    fn parameter_names(&self) -> &[&str] {
        &["messages", "memory_bank"]
    }

    async fn call(
        &self,
        _invocation: Invocation<'_>,
    ) -> Result<OrchestratorReply, OrchestratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OrchestratorError::Failed("model endpoint unavailable".to_string()))
    }
}

/// Raises a real failure on the first convention, succeeds on the second
struct RaisesThenSucceeds {
    calls: AtomicUsize,
}

#[async_trait]
impl Orchestrator for RaisesThenSucceeds {
    fn name(&self) -> &str {
        "raises_then_succeeds"
    }

    fn parameter_names(&self) -> &[&str] {
        &[]
    }

    async fn call(
        &self,
        _invocation: Invocation<'_>,
    ) -> Result<OrchestratorReply, OrchestratorError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == 1 {
            Err(OrchestratorError::Failed("transient decoding error".to_string()))
        } else {
            Ok(OrchestratorReply::new("MONITOR - LOW RISK"))
        }
    }
}

fn request<'a>(
    messages: &'a [String],
    cdm: &'a ConjunctionRecord,
    memory: &'a MemoryBank,
) -> InvocationRequest<'a> {
    InvocationRequest {
        messages,
        cdm: Some(cdm),
        memory: Some(memory),
    }
}

#[tokio::test]
async fn test_first_success_stops_probing() {
    let orchestrator = SucceedsAtNth::new(3);
    let messages = vec!["task".to_string()];
    let cdm = ConjunctionRecord::example();
    let memory = MemoryBank::new();

    let reply = invoke(&orchestrator, request(&messages, &cdm, &memory))
        .await
        .unwrap();

    // Third candidate is the named convention; no calls made beyond it
    assert_eq!(reply.text, "EXECUTE via named_cdm_memory");
    assert_eq!(orchestrator.calls(), 3);
}

#[tokio::test]
async fn test_success_on_first_candidate() {
    let orchestrator = SucceedsAtNth::new(1);
    let messages = vec!["task".to_string()];
    let cdm = ConjunctionRecord::example();
    let memory = MemoryBank::new();

    let reply = invoke(&orchestrator, request(&messages, &cdm, &memory))
        .await
        .unwrap();

    assert_eq!(reply.text, "EXECUTE via message_list");
    assert_eq!(orchestrator.calls(), 1);
}

#[tokio::test]
async fn test_success_on_last_candidate() {
    // Full request + matching parameter names yields 6 candidates
    let orchestrator = SucceedsAtNth::new(6);
    let messages = vec!["task".to_string()];
    let cdm = ConjunctionRecord::example();
    let memory = MemoryBank::new();

    let reply = invoke(&orchestrator, request(&messages, &cdm, &memory))
        .await
        .unwrap();

    assert_eq!(reply.text, "EXECUTE via inspected");
    assert_eq!(orchestrator.calls(), 6);
}

#[tokio::test]
async fn test_exhaustion_surfaces_last_failure() {
    let orchestrator = AlwaysRaises::new();
    let messages = vec!["task".to_string()];
    let cdm = ConjunctionRecord::example();
    let memory = MemoryBank::new();

    let result = invoke(&orchestrator, request(&messages, &cdm, &memory)).await;

    match result {
        Err(InvocationError::Exhausted { last }) => {
            assert!(last.contains("model endpoint unavailable"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }

    // Every candidate was attempted before giving up
    assert_eq!(orchestrator.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_non_mismatch_failure_still_advances() {
    let orchestrator = RaisesThenSucceeds {
        calls: AtomicUsize::new(0),
    };
    let messages = vec!["task".to_string()];
    let cdm = ConjunctionRecord::example();
    let memory = MemoryBank::new();

    let reply = invoke(&orchestrator, request(&messages, &cdm, &memory))
        .await
        .unwrap();

    assert_eq!(reply.text, "MONITOR - LOW RISK");
    assert_eq!(orchestrator.calls.load(Ordering::SeqCst), 2);
}
