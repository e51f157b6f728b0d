// Producer - 変換ジョブ配信機能

use crate::core::ConversionJob;
use tokio::sync::mpsc;

/// Producer: 変換ジョブを作業チャンネルへ配信
pub fn spawn_producer(
    jobs: Vec<ConversionJob>,
    work_tx: mpsc::Sender<ConversionJob>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for job in jobs {
            if work_tx.send(job).await.is_err() {
                // 全Consumerが終了している
                break;
            }
        }
        // work_txのドロップでチャンネル終了を通知
    })
}
