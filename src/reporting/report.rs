// バッチ結果のJSONレポート

use crate::core::{BatchSummary, ConversionOptions};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// `--report` で書き出される内容
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub options: &'a ConversionOptions,
    pub summary: &'a BatchSummary,
}

impl<'a> BatchReport<'a> {
    pub fn new(
        source: &Path,
        destination: &Path,
        options: &'a ConversionOptions,
        summary: &'a BatchSummary,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            options,
            summary,
        }
    }
}

/// レポートをJSONで書き出す
pub fn write_report(path: &Path, report: &BatchReport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("レポートのシリアライズに失敗")?;
    std::fs::write(path, json)
        .with_context(|| format!("レポートを書き込めません: {}", path.display()))?;
    Ok(())
}
