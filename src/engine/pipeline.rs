// Pipeline - Producer-Consumer パイプライン
// 変換ジョブの配信・並列変換・結果集計のオーケストレーション

use super::{
    collector::{spawn_result_collector, CollectedResults},
    consumer::spawn_consumers,
    producer::spawn_producer,
};
use crate::converter::ImageConverter;
use crate::core::{ConversionJob, ConversionOutcome, ConvertError, ConvertResult, ProgressReporter};
use crate::decoder::SourceDecoder;
use std::sync::Arc;
use tokio::sync::mpsc;

/// ワーカー1つあたりのチャンネルバッファ
const CHANNEL_BUFFER_PER_WORKER: usize = 2;

pub struct ConversionPipeline<D> {
    converter: Arc<ImageConverter<D>>,
}

impl<D> ConversionPipeline<D>
where
    D: SourceDecoder + 'static,
{
    pub fn new(converter: Arc<ImageConverter<D>>) -> Self {
        Self { converter }
    }

    /// ジョブリストを並列変換し、集計結果を返す
    ///
    /// 個別ファイルの失敗は集計に含まれ、ここではエラーにならない。
    pub async fn execute<R>(
        &self,
        jobs: Vec<ConversionJob>,
        workers: usize,
        reporter: Arc<R>,
    ) -> ConvertResult<CollectedResults>
    where
        R: ProgressReporter + ?Sized + 'static,
    {
        let total_jobs = jobs.len();
        if total_jobs == 0 {
            return Ok(CollectedResults::default());
        }

        let workers = workers.clamp(1, total_jobs);
        let buffer_size = workers * CHANNEL_BUFFER_PER_WORKER;

        // Producer-Consumerチャンネル構築
        let (work_tx, work_rx) = mpsc::channel::<ConversionJob>(buffer_size);
        let (result_tx, result_rx) = mpsc::channel::<ConversionOutcome>(buffer_size);

        let producer_handle = spawn_producer(jobs, work_tx);
        let consumer_handles =
            spawn_consumers(Arc::clone(&self.converter), work_rx, result_tx, workers);
        let collector_handle = spawn_result_collector(result_rx, total_jobs, reporter);

        producer_handle
            .await
            .map_err(|e| ConvertError::task(format!("producer: {e}")))?;

        for handle in consumer_handles {
            handle
                .await
                .map_err(|e| ConvertError::task(format!("consumer: {e}")))?;
        }

        // 全Consumerのresult_txがドロップされCollectorが終了する
        collector_handle
            .await
            .map_err(|e| ConvertError::task(format!("collector: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionOptions, FileTask, OutputFormat};
    use crate::decoder::{DecodedImage, MockSourceDecoder};
    use crate::reporting::NoOpProgressReporter;
    use image::DynamicImage;
    use std::path::Path;
    use tempfile::TempDir;

    fn pipeline() -> ConversionPipeline<MockSourceDecoder> {
        let mut decoder = MockSourceDecoder::new();
        decoder.expect_decode().returning(|path| {
            if path.to_string_lossy().contains("broken") {
                Err(ConvertError::decode(path, "invalid heif"))
            } else {
                Ok(DecodedImage::new(DynamicImage::new_rgb8(3, 2)))
            }
        });
        let options = ConversionOptions::default().with_format(OutputFormat::Png);
        ConversionPipeline::new(Arc::new(ImageConverter::new(decoder, options)))
    }

    fn jobs(dir: &Path, names: &[&str]) -> Vec<ConversionJob> {
        names
            .iter()
            .map(|name| ConversionJob {
                task: FileTask::new(dir.join(format!("{name}.heic")), format!("{name}.heic")),
                output: dir.join("out").join(format!("{name}.png")),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_pipeline_converts_every_job() {
        let temp_dir = TempDir::new().unwrap();
        let jobs = jobs(temp_dir.path(), &["one", "two", "three", "four"]);
        let outputs: Vec<_> = jobs.iter().map(|job| job.output.clone()).collect();

        let results = pipeline()
            .execute(jobs, 2, Arc::new(NoOpProgressReporter::new()))
            .await
            .unwrap();

        assert_eq!(results.converted, 4);
        assert_eq!(results.errors, 0);
        assert!(outputs.iter().all(|output| output.exists()));
    }

    #[tokio::test]
    async fn test_pipeline_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let jobs = jobs(temp_dir.path(), &["a", "broken", "b"]);

        let results = pipeline()
            .execute(jobs, 8, Arc::new(NoOpProgressReporter::new()))
            .await
            .unwrap();

        assert_eq!((results.converted, results.errors), (2, 1));
        assert!(results.failures[0].input.ends_with("broken.heic"));
    }

    #[tokio::test]
    async fn test_pipeline_without_jobs() {
        let results = pipeline()
            .execute(Vec::new(), 4, Arc::new(NoOpProgressReporter::new()))
            .await
            .unwrap();

        assert_eq!(results, CollectedResults::default());
    }
}
