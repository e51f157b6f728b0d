// BatchConverter - ディレクトリ単位の一括変換
// 依存関係はコンストラクタで注入し、並列部分はパイプラインに委譲する

use super::pipeline::ConversionPipeline;
use crate::converter::ImageConverter;
use crate::core::{
    BatchSummary, ConversionJob, ConversionOptions, ConvertError, ConvertResult, FileFailure,
    FileTask, ProgressReporter,
};
use crate::decoder::{DefaultDecoder, SourceDecoder};
use crate::file_scanner::FileScanner;
use crate::reporting::NoOpProgressReporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// 変換前の計画結果
#[derive(Debug, Default)]
struct BatchPlan {
    jobs: Vec<ConversionJob>,
    /// 既存出力のため変換しない (入力, 出力)
    skipped: Vec<(PathBuf, PathBuf)>,
    failures: Vec<FileFailure>,
}

/// 出力パスを計算し、スキップ判定と出力サブディレクトリの作成を行う
///
/// ファイルシステムを触るため `spawn_blocking` から呼ぶ。
fn plan_jobs(
    tasks: Vec<FileTask>,
    dest_root: &Path,
    extension: &str,
    overwrite: bool,
) -> BatchPlan {
    let mut plan = BatchPlan::default();

    for task in tasks {
        let output = task.output_path(dest_root, extension);

        if !overwrite && output.exists() {
            tracing::debug!(output = %output.display(), "output exists, skipping");
            plan.skipped.push((task.input, output));
            continue;
        }

        if let Some(parent) = output.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                let message = ConvertError::io(parent, e).to_string();
                tracing::error!(input = %task.input.display(), error = %message, "cannot create output directory");
                plan.failures.push(FileFailure {
                    input: task.input,
                    message,
                });
                continue;
            }
        }

        plan.jobs.push(ConversionJob { task, output });
    }

    plan
}

/// 一括変換エンジン
pub struct BatchConverter<D, R> {
    converter: Arc<ImageConverter<D>>,
    reporter: Arc<R>,
}

impl<D, R> BatchConverter<D, R>
where
    D: SourceDecoder + 'static,
    R: ProgressReporter + 'static,
{
    pub fn new(decoder: D, options: ConversionOptions, reporter: R) -> Self {
        Self {
            converter: Arc::new(ImageConverter::new(decoder, options)),
            reporter: Arc::new(reporter),
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        self.converter.options()
    }

    /// 入力ディレクトリを変換して出力ディレクトリに書き出す
    ///
    /// 入力ルートの不在・不正な設定・出力ルートの作成失敗のみがエラーになる。
    /// 個別ファイルの失敗は `BatchSummary` に集計される。
    pub async fn run(
        &self,
        source: impl AsRef<Path>,
        dest: impl AsRef<Path>,
    ) -> ConvertResult<BatchSummary> {
        let start_time = Instant::now();
        let options = self.options();

        // 事前条件の検証（ファイルには一切触れない）
        let scanner = FileScanner::new(source.as_ref(), options.recursive)?;
        options.validate()?;
        if options.exceeds_recommended_quality() {
            tracing::warn!(
                quality = options.quality,
                "quality above 95 inflates file size without a visible gain"
            );
        }

        let dest = dest.as_ref();
        std::fs::create_dir_all(dest).map_err(|e| ConvertError::io(dest, e))?;
        let dest_root = std::path::absolute(dest).map_err(|e| ConvertError::io(dest, e))?;

        tracing::info!(
            source = %scanner.root().display(),
            dest = %dest_root.display(),
            format = %options.format,
            decoder = self.converter.decoder().backend_name(),
            "scanning source directory"
        );

        let tasks: Vec<_> = scanner.scan().collect();
        let mut summary = BatchSummary {
            discovered: tasks.len(),
            ..BatchSummary::default()
        };

        if tasks.is_empty() {
            tracing::info!("no HEIC/HEIF files found");
            summary.elapsed_ms = start_time.elapsed().as_millis() as u64;
            self.reporter.report_completed(&summary).await;
            return Ok(summary);
        }

        let workers = options.resolve_workers();
        self.reporter.report_started(tasks.len(), workers).await;

        let extension = options.format.extension();
        let overwrite = options.overwrite;
        // 存在確認とディレクトリ作成はブロッキングスレッドで行う
        let plan = tokio::task::spawn_blocking(move || {
            plan_jobs(tasks, &dest_root, extension, overwrite)
        })
        .await
        .map_err(|e| ConvertError::task(format!("planner: {e}")))?;

        for (input, output) in &plan.skipped {
            self.reporter.report_skipped(input, output).await;
        }
        for failure in &plan.failures {
            self.reporter.report_error(&failure.input, &failure.message).await;
        }
        summary.skipped = plan.skipped.len();
        summary.errors = plan.failures.len();
        summary.failures = plan.failures;

        let pipeline = ConversionPipeline::new(Arc::clone(&self.converter));
        let results = pipeline
            .execute(plan.jobs, workers, Arc::clone(&self.reporter))
            .await?;

        summary.converted = results.converted;
        summary.errors += results.errors;
        summary.failures.extend(results.failures);
        summary.elapsed_ms = start_time.elapsed().as_millis() as u64;

        self.reporter.report_completed(&summary).await;
        Ok(summary)
    }
}

/// 既定のデコーダーと無音の報告先でディレクトリを一括変換
pub async fn convert_directory(
    source: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: ConversionOptions,
) -> ConvertResult<BatchSummary> {
    BatchConverter::new(DefaultDecoder::new(), options, NoOpProgressReporter::new())
        .run(source, dest)
        .await
}
