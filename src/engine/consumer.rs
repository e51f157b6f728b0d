// Consumer - 並列ワーカー機能

use crate::converter::ImageConverter;
use crate::core::{ConversionJob, ConversionOutcome, ConvertError};
use crate::decoder::SourceDecoder;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// 1件の変換をブロッキングスレッドで実行
///
/// 変換中のパニックも `Failed` として扱い、バッチは継続する。
pub async fn run_job<D>(
    converter: Arc<ImageConverter<D>>,
    job: ConversionJob,
    worker_id: usize,
) -> ConversionOutcome
where
    D: SourceDecoder + 'static,
{
    let ConversionJob { task, output } = job;
    let input = task.input;

    let result = tokio::task::spawn_blocking({
        let input = input.clone();
        let output = output.clone();
        move || converter.convert(&input, &output)
    })
    .await;

    match result {
        Ok(Ok(metadata)) => ConversionOutcome::Converted {
            input,
            output,
            metadata,
        },
        Ok(Err(error)) => ConversionOutcome::Failed { input, error },
        Err(join_error) => ConversionOutcome::Failed {
            input,
            error: ConvertError::task(format!("worker {worker_id}: {join_error}")),
        },
    }
}

/// 単一Consumerワーカー
pub fn spawn_single_consumer<D>(
    worker_id: usize,
    converter: Arc<ImageConverter<D>>,
    work_rx: Arc<Mutex<mpsc::Receiver<ConversionJob>>>,
    result_tx: mpsc::Sender<ConversionOutcome>,
) -> tokio::task::JoinHandle<()>
where
    D: SourceDecoder + 'static,
{
    tokio::spawn(async move {
        loop {
            // 次の作業を取得
            let job = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(job) => job,
                    None => break, // チャンネル終了
                }
            };

            let outcome = run_job(converter.clone(), job, worker_id).await;

            if result_tx.send(outcome).await.is_err() {
                // 結果チャンネルが閉じられた場合は終了
                break;
            }
        }
        tracing::trace!(worker_id, "worker finished");
    })
}

/// Consumers: 固定サイズのワーカープール
pub fn spawn_consumers<D>(
    converter: Arc<ImageConverter<D>>,
    work_rx: mpsc::Receiver<ConversionJob>,
    result_tx: mpsc::Sender<ConversionOutcome>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<()>>
where
    D: SourceDecoder + 'static,
{
    let work_rx = Arc::new(Mutex::new(work_rx));

    (0..worker_count.max(1))
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                converter.clone(),
                work_rx.clone(),
                result_tx.clone(),
            )
        })
        .collect()
}
