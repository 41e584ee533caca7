//! Long-term strategy memory.
//!
//! An append-only, in-process store of executed avoidance strategies,
//! consulted by orchestrators for historical context. No deduplication
//! and no eviction; lifetime is one process.

use anyhow::{bail, Result};
use tracing::info;

use crate::domain::{PipelineOutcome, StrategyRecord};

/// In-memory knowledge base of executed maneuver strategies
#[derive(Debug, Default)]
pub struct MemoryBank {
    knowledge_base: Vec<StrategyRecord>,
}

impl MemoryBank {
    /// Create an empty memory bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an executed avoidance strategy
    pub fn store_strategy(&mut self, outcome: &PipelineOutcome) {
        let record = StrategyRecord::from_outcome(outcome);
        info!(cdm_id = record.cdm_id, "Stored successful strategy in memory");
        self.knowledge_base.push(record);
    }

    /// All stored strategies, in insertion order
    pub fn records(&self) -> &[StrategyRecord] {
        &self.knowledge_base
    }

    /// Number of stored strategies
    pub fn len(&self) -> usize {
        self.knowledge_base.len()
    }

    /// Whether any strategy has been stored
    pub fn is_empty(&self) -> bool {
        self.knowledge_base.is_empty()
    }

    /// Compact a window of recent operator messages into a one-line
    /// summary.
    ///
    /// The summary always reports the full message count and quotes the
    /// most recent message. Fails on an empty window.
    pub fn compact_context(&self, recent_messages: &[String]) -> Result<String> {
        let Some(last) = recent_messages.last() else {
            bail!("Cannot compact an empty message window");
        };

        Ok(format!(
            "Operator has reviewed {} CDMs. Last message was: '{}'.",
            recent_messages.len(),
            last
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executed_outcome(cdm_id: u64) -> PipelineOutcome {
        PipelineOutcome {
            cdm_id,
            final_status: "EXECUTE".to_string(),
            calculated_pc: 0.0003,
            delta_v_kms: 0.000246,
        }
    }

    #[test]
    fn test_store_strategy_appends_in_order() {
        let mut memory = MemoryBank::new();
        memory.store_strategy(&executed_outcome(1));
        memory.store_strategy(&executed_outcome(2));

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.records()[0].cdm_id, 1);
        assert_eq!(memory.records()[1].cdm_id, 2);
    }

    #[test]
    fn test_compact_context_reports_count_and_last() {
        let memory = MemoryBank::new();
        let messages = vec![
            "CDM 1 monitored".to_string(),
            "CDM 2 executed".to_string(),
            "CDM 3 rejected".to_string(),
        ];

        let summary = memory.compact_context(&messages).unwrap();
        assert!(summary.contains("3 CDMs"));
        assert!(summary.contains("CDM 3 rejected"));
    }

    #[test]
    fn test_compact_context_single_message() {
        let memory = MemoryBank::new();
        let messages = vec!["only one".to_string()];

        let summary = memory.compact_context(&messages).unwrap();
        assert!(summary.contains("1 CDMs"));
        assert!(summary.contains("only one"));
    }

    #[test]
    fn test_compact_context_rejects_empty_window() {
        let memory = MemoryBank::new();
        assert!(memory.compact_context(&[]).is_err());
    }
}
