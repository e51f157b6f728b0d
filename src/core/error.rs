// 変換処理のカスタムエラー型定義

use std::path::{Path, PathBuf};
use thiserror::Error;

/// 変換処理固有のエラー型
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("未対応の出力形式: '{format}' (jpeg または png を指定してください)")]
    UnsupportedFormat { format: String },

    #[error("入力フォルダが見つかりません: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("デコードエラー: {} - {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("エンコードエラー: {} - {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("I/Oエラー: {} - {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("タスクエラー: {message}")]
    Task { message: String },
}

/// 変換処理の結果型
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 未対応形式エラーの作成
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn source_not_found(path: impl AsRef<Path>) -> Self {
        Self::SourceNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// デコードエラーの作成
    pub fn decode(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// エンコードエラーの作成
    pub fn encode(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Encode {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// タスクエラーの作成
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Configuration { .. } | Self::UnsupportedFormat { .. } => ErrorSeverity::Critical,
            Self::SourceNotFound { .. } => ErrorSeverity::Critical,
            Self::Decode { .. } | Self::Encode { .. } => ErrorSeverity::Medium,
            Self::Io { .. } => ErrorSeverity::High,
            Self::Task { .. } => ErrorSeverity::High,
        }
    }

    /// 関連するファイルパス（あれば）
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceNotFound { path }
            | Self::Decode { path, .. }
            | Self::Encode { path, .. }
            | Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 中重要度 - ファイル単位の失敗
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - バッチ開始前に中断
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
