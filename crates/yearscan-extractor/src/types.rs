//! Batch report types

use yearscan_domain::ExtractionResult;

/// Result of processing one batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One result per distinct record: rule-resolved first, then the rest
    pub results: Vec<ExtractionResult>,

    /// Counters describing how the batch was processed
    pub metadata: BatchMetadata,
}

/// Counters describing a processed batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMetadata {
    /// Records received
    pub total_records: usize,

    /// Records resolved by the rule engine
    pub resolved_by_rule: usize,

    /// Records sent to the model
    pub sent_to_ai: usize,

    /// Records the model resolved to a real year (after verification)
    pub resolved_by_ai: usize,

    /// Model calls that failed or timed out
    pub inference_failures: usize,

    /// AI years reset by verification
    pub rejected_by_verification: usize,

    /// Unresolved records never sent because the batch was cancelled
    pub skipped_by_cancel: usize,

    /// Identical rows dropped during the merge
    pub duplicates_removed: usize,

    /// Wall-clock processing time
    pub processing_time_ms: u64,
}
