// 変換処理に関連するデータ型定義

use super::error::ConvertError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 列挙された入力ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// 入力ファイルの絶対パス
    pub input: PathBuf,
    /// 入力ルートからの相対パス
    pub relative: PathBuf,
}

impl FileTask {
    pub fn new(input: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            relative: relative.into(),
        }
    }

    /// 出力ルートと拡張子から出力パスを計算
    pub fn output_path(&self, dest_root: &Path, extension: &str) -> PathBuf {
        dest_root.join(&self.relative).with_extension(extension)
    }
}

/// ワーカーに渡される1件分の変換ジョブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub task: FileTask,
    pub output: PathBuf,
}

/// 変換成功時のメタデータ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionMetadata {
    pub dimensions: (u32, u32),
    pub orientation_applied: bool,
    pub exif_embedded: bool,
    pub icc_embedded: bool,
    pub output_bytes: u64,
    pub processing_time_ms: u64,
}

/// 個別変換の結果
#[derive(Debug)]
pub enum ConversionOutcome {
    Converted {
        input: PathBuf,
        output: PathBuf,
        metadata: ConversionMetadata,
    },
    Failed {
        input: PathBuf,
        error: ConvertError,
    },
}

impl ConversionOutcome {
    pub fn input(&self) -> &Path {
        match self {
            Self::Converted { input, .. } | Self::Failed { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

/// 失敗したファイルの記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub input: PathBuf,
    pub message: String,
}

/// バッチ全体のサマリー
///
/// `converted` と `errors` には既存出力でスキップしたファイルは含まれない。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub discovered: usize,
    pub converted: usize,
    pub errors: usize,
    pub skipped: usize,
    pub elapsed_ms: u64,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    /// (変換数, エラー数)
    pub fn counts(&self) -> (usize, usize) {
        (self.converted, self.errors)
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
