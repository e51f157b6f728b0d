// バッチ変換システムのトレイト定義

use super::types::BatchSummary;
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_files: usize, workers: usize);

    /// 既存出力によるスキップの報告
    async fn report_skipped(&self, input: &Path, output: &Path);

    /// 1ファイル変換成功の報告
    async fn report_converted(&self, input: &Path, output: &Path);

    /// エラー発生時の報告
    async fn report_error(&self, input: &Path, error: &str);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// 処理完了時の報告
    async fn report_completed(&self, summary: &BatchSummary);
}
