//! Record classification pipeline
//!
//! A batch moves through five stages:
//!
//! ```text
//! INIT → RULE_PASS → AI_PASS → VERIFY → MERGE
//! ```
//!
//! The rule pass is synchronous. The AI pass fans out one inference per
//! unresolved record and collects answers as they complete, so results are
//! reassembled by id rather than by completion order.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::prompt::PromptBuilder;
use crate::sanitize::{extract_year_token, sanitize};
use crate::types::{BatchMetadata, BatchReport};
use crate::verify::AiResultVerifier;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use yearscan_domain::traits::{LlmProvider, YearExtractor};
use yearscan_domain::{ExtractionResult, Origin, Record, YEAR_SENTINEL};
use yearscan_llm::{is_error_marker, InferenceClient};
use yearscan_rules::RuleBasedYearExtractor;

/// What the model produced for one record
enum AiOutcome {
    Year(String),
    NotFound,
    Failed,
    Skipped,
}

/// Classifies each record's year by rules first, then by the model
pub struct RecordClassificationPipeline<P: LlmProvider> {
    rules: Box<dyn YearExtractor>,
    client: InferenceClient<P>,
    verifier: AiResultVerifier,
    config: ExtractorConfig,
}

impl<P: LlmProvider> RecordClassificationPipeline<P> {
    /// Create a new pipeline
    pub fn new(config: ExtractorConfig, client: InferenceClient<P>) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            rules: Box::new(RuleBasedYearExtractor::new()),
            verifier: AiResultVerifier::new(&config),
            client,
            config,
        })
    }

    /// Replace the rule stage (defaults to [`RuleBasedYearExtractor`])
    pub fn with_rules(mut self, rules: impl YearExtractor + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The inference client used for the AI pass
    pub fn client(&self) -> &InferenceClient<P> {
        &self.client
    }

    /// Process a batch to completion
    pub async fn process(&self, batch: Vec<Record>) -> Result<Vec<ExtractionResult>, ExtractorError> {
        let report = self.process_with_cancel(batch, &CancellationToken::new()).await?;
        Ok(report.results)
    }

    /// Process a batch, issuing no new inferences once `cancel` fires
    ///
    /// Requests already in flight run to completion. Unresolved records that
    /// were never sent come back as `RULE` results with an empty year.
    #[instrument(skip_all, fields(records = batch.len()))]
    pub async fn process_with_cancel(
        &self,
        batch: Vec<Record>,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, ExtractorError> {
        let start = Instant::now();
        let mut metadata = BatchMetadata {
            total_records: batch.len(),
            ..BatchMetadata::default()
        };

        debug!(state = "INIT");
        let texts = index_by_id(&batch)?;

        debug!(state = "RULE_PASS");
        let mut resolved = Vec::new();
        let mut unresolved: Vec<&Record> = Vec::new();
        for record in &batch {
            let year = self.rules.extract(&record.combined_text);
            if year.is_empty() {
                unresolved.push(record);
            } else {
                resolved.push(ExtractionResult::rule(&record.id, year));
            }
        }
        metadata.resolved_by_rule = resolved.len();

        let mut pending = if self.config.enable_ai_process && !unresolved.is_empty() {
            debug!(state = "AI_PASS", unresolved = unresolved.len());
            self.ai_pass(&unresolved, cancel, &mut metadata).await
        } else {
            unresolved
                .iter()
                .map(|record| ExtractionResult::rule(&record.id, ""))
                .collect()
        };

        if self.config.verify_ai_results {
            debug!(state = "VERIFY");
            for result in &mut pending {
                let text = texts.get(result.id.as_str()).copied().unwrap_or_default();
                if self.verifier.apply(result, text) {
                    metadata.rejected_by_verification += 1;
                }
            }
        }
        metadata.resolved_by_ai = pending
            .iter()
            .filter(|r| r.origin == Origin::Ai && r.has_year())
            .count();

        debug!(state = "MERGE");
        let mut results = resolved;
        results.append(&mut pending);
        let before = results.len();
        let mut seen = HashSet::new();
        results.retain(|r| seen.insert(r.clone()));
        metadata.duplicates_removed = before - results.len();

        metadata.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Batch complete: {} records, {} by rule, {} sent to AI, {} by AI, {} failed, {} skipped",
            metadata.total_records,
            metadata.resolved_by_rule,
            metadata.sent_to_ai,
            metadata.resolved_by_ai,
            metadata.inference_failures,
            metadata.skipped_by_cancel
        );

        Ok(BatchReport { results, metadata })
    }

    /// Run one inference per distinct unresolved record
    async fn ai_pass(
        &self,
        unresolved: &[&Record],
        cancel: &CancellationToken,
        metadata: &mut BatchMetadata,
    ) -> Vec<ExtractionResult> {
        let mut distinct = HashSet::new();
        let mut in_flight: FuturesUnordered<_> = unresolved
            .iter()
            .filter(|record| distinct.insert(record.id.as_str()))
            .map(|record| async move {
                let prompt = PromptBuilder::new(&record.combined_text).build();
                let reply = self.client.infer_unless_cancelled(&prompt, cancel).await;
                (record.id.as_str(), reply)
            })
            .collect();

        let mut outcomes: HashMap<&str, AiOutcome> = HashMap::new();
        while let Some((id, reply)) = in_flight.next().await {
            let outcome = match reply {
                None => AiOutcome::Skipped,
                Some(text) if is_error_marker(&text) => {
                    warn!(id, "Inference failed: {}", text);
                    AiOutcome::Failed
                }
                Some(text) => {
                    let token = extract_year_token(&sanitize(&text));
                    debug!(id, answer = %text, year = %token, "Inference complete");
                    if token == YEAR_SENTINEL {
                        AiOutcome::NotFound
                    } else {
                        AiOutcome::Year(token)
                    }
                }
            };
            outcomes.insert(id, outcome);
        }

        for outcome in outcomes.values() {
            match outcome {
                AiOutcome::Skipped => metadata.skipped_by_cancel += 1,
                AiOutcome::Failed => {
                    metadata.sent_to_ai += 1;
                    metadata.inference_failures += 1;
                }
                AiOutcome::Year(_) | AiOutcome::NotFound => metadata.sent_to_ai += 1,
            }
        }
        if metadata.skipped_by_cancel > 0 {
            info!("Cancelled: {} records were not sent to the model", metadata.skipped_by_cancel);
        }

        let not_found = self.config.not_found_return_value.as_str();
        unresolved
            .iter()
            .map(|record| match outcomes.get(record.id.as_str()) {
                Some(AiOutcome::Year(year)) => ExtractionResult::ai(&record.id, year.as_str()),
                Some(AiOutcome::NotFound) | Some(AiOutcome::Failed) => {
                    ExtractionResult::ai(&record.id, not_found)
                }
                Some(AiOutcome::Skipped) | None => ExtractionResult::rule(&record.id, ""),
            })
            .collect()
    }
}

/// Map ids to text, rejecting ids that disagree about their text
fn index_by_id(batch: &[Record]) -> Result<HashMap<&str, &str>, ExtractorError> {
    let mut texts = HashMap::with_capacity(batch.len());
    for record in batch {
        if record.id.trim().is_empty() {
            return Err(ExtractorError::InvalidRecord("record with empty id".to_string()));
        }
        if let Some(existing) = texts.insert(record.id.as_str(), record.combined_text.as_str()) {
            if existing != record.combined_text {
                return Err(ExtractorError::DuplicateId(record.id.clone()));
            }
        }
    }
    Ok(texts)
}
