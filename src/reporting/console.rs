use crate::core::{BatchSummary, ProgressReporter};
use async_trait::async_trait;
use std::path::Path;

/// コンソール出力による進捗報告実装
#[derive(Debug, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
    progress_interval: usize,
}

impl Default for ConsoleProgressReporter {
    fn default() -> Self {
        Self {
            quiet: false,
            progress_interval: 10,
        }
    }
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    /// 進捗表示の間隔（ファイル数）
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    fn should_print_progress(&self, completed: usize, total: usize) -> bool {
        completed == total || completed % self.progress_interval == 0
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_files: usize, workers: usize) {
        tracing::info!(total_files, workers, "conversion started");
        if !self.quiet {
            println!("🚀 {total_files} ファイルを変換します（ワーカー数: {workers}）");
        }
    }

    async fn report_skipped(&self, input: &Path, output: &Path) {
        tracing::debug!(input = %input.display(), output = %output.display(), "output exists, skipped");
    }

    async fn report_converted(&self, input: &Path, output: &Path) {
        tracing::debug!(input = %input.display(), output = %output.display(), "converted");
    }

    // 個別エラーは tracing で標準エラーに出力済みのため、ここでは表示しない
    async fn report_error(&self, _input: &Path, _error: &str) {}

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && self.should_print_progress(completed, total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 進捗: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_completed(&self, summary: &BatchSummary) {
        tracing::info!(
            converted = summary.converted,
            errors = summary.errors,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed_ms,
            "conversion finished"
        );
        if !self.quiet {
            println!();
            println!("--- 変換完了 ---");
            println!("✅ 変換成功: {}", summary.converted);
            println!("❌ エラー: {}", summary.errors);
            if summary.skipped > 0 {
                println!("⏭️  既存のためスキップ: {}", summary.skipped);
            }
        }
    }
}

/// 何もしない進捗報告実装（ライブラリAPI・テスト用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_files: usize, _workers: usize) {}

    async fn report_skipped(&self, _input: &Path, _output: &Path) {}

    async fn report_converted(&self, _input: &Path, _output: &Path) {}

    async fn report_error(&self, _input: &Path, _error: &str) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_completed(&self, _summary: &BatchSummary) {}
}
