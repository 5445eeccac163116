//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::CliConfig;
use crate::confirm::ask_yes_no;
use crate::error::Result;
use crate::io::{read_records, ResultWriter};
use std::fs::File;
use std::future::Future;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use yearscan_domain::traits::LlmProvider;
use yearscan_domain::Record;
use yearscan_extractor::RecordClassificationPipeline;
use yearscan_llm::{ChatCompletionsProvider, InferenceClient};

/// How a chunked run ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Chunks the input was split into
    pub chunks_total: usize,
    /// Chunks processed and written
    pub chunks_processed: usize,
    /// Result rows written
    pub rows_written: usize,
    /// The user declined to continue
    pub aborted: bool,
    /// The run was interrupted
    pub cancelled: bool,
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, mut config: CliConfig) -> Result<()> {
    config.apply_extract_args(&args);
    config.validate()?;

    let records = read_records(&args.input)?;
    info!("Loaded {} records from {}", records.len(), args.input.display());

    let provider = ChatCompletionsProvider::new(config.llm.clone())?;
    let pipeline = RecordClassificationPipeline::new(config.extractor.clone(), InferenceClient::new(provider))?;
    if config.extractor.enable_ai_process {
        info!("AI fallback enabled: {} ({})", config.llm.endpoint, config.llm.model);
    }

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received: finishing requests in flight, no new requests");
                cancel.cancel();
            }
        }
    });

    let file = BufWriter::new(File::create(&args.output)?);
    let mut writer = ResultWriter::new(file, config.io.include_combined)?;

    let prompt = config.io.prompt_after_chunk;
    let summary = run_chunks(
        &pipeline,
        &records,
        config.io.chunk_size,
        &mut writer,
        &cancel,
        |index, total| async move {
            if !prompt {
                return true;
            }
            let question = format!("Process chunk {} of {}?", index + 1, total);
            confirm_blocking(move || ask_yes_no(&question)).await
        },
    )
    .await;
    interrupt.abort();
    let summary = summary?;
    writer.finish()?.flush()?;

    println!(
        "Wrote {} rows from {} of {} chunks to {}",
        summary.rows_written,
        summary.chunks_processed,
        summary.chunks_total,
        args.output.display()
    );
    Ok(())
}

/// Run a blocking terminal prompt off the async worker threads.
///
/// A failed prompt or a panicked prompt thread counts as "no".
pub async fn confirm_blocking<F>(ask: F) -> bool
where
    F: FnOnce() -> io::Result<bool> + Send + 'static,
{
    match tokio::task::spawn_blocking(ask).await {
        Ok(Ok(answer)) => answer,
        Ok(Err(e)) => {
            warn!("Could not read confirmation: {}", e);
            false
        }
        Err(e) => {
            warn!("Confirmation prompt failed: {}", e);
            false
        }
    }
}

/// Process `records` in chunks of `chunk_size` (0 = one chunk).
///
/// `confirm` is awaited before every chunk with the chunk index and count; a
/// `false` stops the run. Results of finished chunks are already written and
/// stay in place. A cancelled token stops the run after the current chunk.
pub async fn run_chunks<P, W, F, Fut>(
    pipeline: &RecordClassificationPipeline<P>,
    records: &[Record],
    chunk_size: usize,
    writer: &mut ResultWriter<W>,
    cancel: &CancellationToken,
    mut confirm: F,
) -> Result<ChunkSummary>
where
    P: LlmProvider,
    W: Write,
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = bool>,
{
    let size = if chunk_size == 0 { records.len().max(1) } else { chunk_size };
    let chunks: Vec<&[Record]> = records.chunks(size).collect();
    let mut summary = ChunkSummary {
        chunks_total: chunks.len(),
        ..ChunkSummary::default()
    };

    for (index, chunk) in chunks.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!("Cancelled: {} chunks left unprocessed", chunks.len() - index);
            summary.cancelled = true;
            break;
        }
        if !confirm(index, chunks.len()).await {
            warn!("Aborted by user before chunk {} of {}", index + 1, chunks.len());
            summary.aborted = true;
            break;
        }

        info!("--- Processing chunk {} of {} ({} records) ---", index + 1, chunks.len(), chunk.len());
        let start = Instant::now();

        let report = pipeline.process_with_cancel(chunk.to_vec(), cancel).await?;
        writer.write_batch(&report.results, chunk)?;

        info!(
            "Chunk {} of {} processed in {:.2} seconds",
            index + 1,
            chunks.len(),
            start.elapsed().as_secs_f64()
        );
        summary.chunks_processed += 1;
        summary.rows_written += report.results.len();
    }

    if cancel.is_cancelled() {
        summary.cancelled = true;
    }
    if !summary.aborted && !summary.cancelled {
        info!("All chunks processed");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_blocking_answers() {
        assert!(confirm_blocking(|| Ok(true)).await);
        assert!(!confirm_blocking(|| Ok(false)).await);
    }

    #[tokio::test]
    async fn test_confirm_blocking_failure_is_no() {
        assert!(!confirm_blocking(|| Err(io::Error::other("stdin closed"))).await);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_prompt_does_not_block_runtime() {
        let (tx, rx) = std::sync::mpsc::channel::<bool>();
        let ticker = tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx.send(true).unwrap();
        });

        // The prompt waits for the ticker, which only runs if this thread is free.
        let answer = confirm_blocking(move || Ok(rx.recv().unwrap_or(false))).await;

        assert!(answer);
        ticker.await.unwrap();
    }
}
