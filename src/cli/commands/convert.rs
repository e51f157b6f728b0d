use crate::cli::Cli;
use crate::core::{BatchSummary, ConversionOptions, OutputFormat};
use crate::decoder::DefaultDecoder;
use crate::engine::BatchConverter;
use crate::reporting::{write_report, BatchReport, ConsoleProgressReporter};
use anyhow::{Context, Result};
use std::path::Path;

/// 設定ファイルを読み込み、明示されたフラグで上書きする
pub fn build_options(cli: &Cli) -> Result<ConversionOptions> {
    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConversionOptions::default(),
    };

    if let Some(format) = &cli.format {
        options.format = format.parse::<OutputFormat>()?;
    }
    if let Some(quality) = cli.quality {
        options.quality = quality;
    }
    if let Some(subsampling) = cli.subsampling {
        options.subsampling = subsampling.into();
    }
    if let Some(threads) = cli.threads {
        options.workers = threads;
    }
    if cli.no_progressive {
        options.progressive = false;
    }
    if cli.no_optimize {
        options.optimize = false;
    }
    if cli.no_metadata {
        options.preserve_metadata = false;
    }
    if cli.no_recursive {
        options.recursive = false;
    }
    if cli.overwrite {
        options.overwrite = true;
    }

    Ok(options)
}

fn load_config(path: &Path) -> Result<ConversionOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("設定ファイルを読み込めません: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("設定ファイルの形式が不正です: {}", path.display()))
}

/// 一括変換コマンドを実行
pub async fn execute_convert(cli: Cli) -> Result<BatchSummary> {
    let options = build_options(&cli)?;

    if !cli.quiet {
        println!("🔄 HEIC/HEIF 一括変換");
        println!("   - 入力ディレクトリ: {}", cli.source.display());
        println!("   - 出力ディレクトリ: {}", cli.dest.display());
        println!("   - 出力形式: {}", options.format);
        if options.format == OutputFormat::Jpeg {
            println!(
                "   - 品質: {} / サブサンプリング: {}",
                options.quality, options.subsampling
            );
        }
    }

    // --quiet でもログには開始・完了を残す
    let reporter = if cli.quiet {
        ConsoleProgressReporter::quiet()
    } else {
        ConsoleProgressReporter::new()
    };

    let converter = BatchConverter::new(DefaultDecoder::new(), options.clone(), reporter);
    let summary = converter
        .run(&cli.source, &cli.dest)
        .await
        .with_context(|| format!("変換を開始できません: {}", cli.source.display()))?;

    if let Some(report_path) = &cli.report {
        let report = BatchReport::new(&cli.source, &cli.dest, &options, &summary);
        write_report(report_path, &report)?;
        if !cli.quiet {
            println!("📄 レポートを {} に保存しました", report_path.display());
        }
    }

    if summary.has_errors() {
        tracing::warn!(errors = summary.errors, "some files could not be converted");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChromaSubsampling;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_flags_without_config() {
        let cli = Cli::parse_from(["heic_convert", "-f", "PNG", "--no-metadata", "-t", "3"]);
        let options = build_options(&cli).unwrap();

        assert_eq!(options.format, OutputFormat::Png);
        assert!(!options.preserve_metadata);
        assert_eq!(options.workers, 3);
        assert_eq!(options.quality, 95);
    }

    #[test]
    fn test_flags_override_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("options.json");
        std::fs::write(
            &config_path,
            r#"{ "format": "png", "quality": 70, "subsampling": "4:2:0", "overwrite": true }"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "heic_convert",
            "-c",
            config_path.to_str().unwrap(),
            "-f",
            "jpg",
            "-q",
            "88",
        ]);
        let options = build_options(&cli).unwrap();

        assert_eq!(options.format, OutputFormat::Jpeg);
        assert_eq!(options.quality, 88);
        // 設定ファイルの値はフラグが無ければ維持される
        assert_eq!(options.subsampling, ChromaSubsampling::Yuv420);
        assert!(options.overwrite);
        assert!(options.progressive);
    }

    #[test]
    fn test_unsupported_format_flag() {
        let cli = Cli::parse_from(["heic_convert", "-f", "webp"]);
        let error = build_options(&cli).unwrap_err();

        assert!(error.to_string().contains("webp"));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::parse_from(["heic_convert", "-c", "/no/such/options.json"]);
        assert!(build_options(&cli).is_err());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("options.json");
        std::fs::write(&config_path, r#"{ "format": "gif" }"#).unwrap();

        let cli = Cli::parse_from(["heic_convert", "-c", config_path.to_str().unwrap()]);
        assert!(build_options(&cli).is_err());
    }

    #[tokio::test]
    async fn test_execute_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing");
        let dest = temp_dir.path().join("out");

        let cli = Cli::parse_from([
            "heic_convert",
            source.to_str().unwrap(),
            dest.to_str().unwrap(),
            "--quiet",
        ]);
        assert!(execute_convert(cli).await.is_err());
    }

    #[tokio::test]
    async fn test_execute_writes_report() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        std::fs::create_dir(&source).unwrap();
        let dest = temp_dir.path().join("out");
        let report = temp_dir.path().join("report.json");

        let cli = Cli::parse_from([
            "heic_convert",
            source.to_str().unwrap(),
            dest.to_str().unwrap(),
            "--quiet",
            "--report",
            report.to_str().unwrap(),
        ]);
        let summary = execute_convert(cli).await.unwrap();

        assert_eq!(summary.counts(), (0, 0));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["summary"]["converted"], 0);
    }
}
