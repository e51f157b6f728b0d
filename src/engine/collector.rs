// Collector - 結果集計機能

use crate::core::{ConversionOutcome, FileFailure, ProgressReporter};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Collectorが集計した結果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectedResults {
    pub converted: usize,
    pub errors: usize,
    pub failures: Vec<FileFailure>,
}

/// Collector: 結果収集と進捗報告
///
/// カウンタはこのタスクだけが保持するため、ワーカー間の共有状態は持たない。
pub fn spawn_result_collector<R>(
    mut result_rx: mpsc::Receiver<ConversionOutcome>,
    total_files: usize,
    reporter: Arc<R>,
) -> tokio::task::JoinHandle<CollectedResults>
where
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut results = CollectedResults::default();

        while let Some(outcome) = result_rx.recv().await {
            match outcome {
                ConversionOutcome::Converted {
                    input,
                    output,
                    metadata,
                } => {
                    tracing::debug!(
                        input = %input.display(),
                        output = %output.display(),
                        width = metadata.dimensions.0,
                        height = metadata.dimensions.1,
                        bytes = metadata.output_bytes,
                        ms = metadata.processing_time_ms,
                        "file converted"
                    );
                    reporter.report_converted(&input, &output).await;
                    results.converted += 1;
                }
                ConversionOutcome::Failed { input, error } => {
                    let message = error.to_string();
                    tracing::error!(
                        input = %input.display(),
                        severity = %error.severity(),
                        error = %message,
                        "conversion failed"
                    );
                    reporter.report_error(&input, &message).await;
                    results.errors += 1;
                    results.failures.push(FileFailure { input, message });
                }
            }

            // 進捗報告
            reporter
                .report_progress(results.converted + results.errors, total_files)
                .await;
        }

        results
    })
}
