//! 変換オプション
//!
//! バッチ全体で共有される不変の設定。JPEG固有の項目（品質・サブサンプリング・
//! プログレッシブ・ハフマン最適化）は出力形式が jpeg の場合のみ使用される。

use super::error::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 自動決定時のワーカー数上限
pub const MAX_AUTO_WORKERS: usize = 32;

/// 品質がこの値を超えるとサイズだけが増える
pub const QUALITY_WARNING_THRESHOLD: u8 = 95;

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// 出力ファイルの正規拡張子（ドットなし）
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(ConvertError::unsupported_format(s)),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JPEGのクロマサブサンプリング
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChromaSubsampling {
    /// 4:4:4 - 色解像度を落とさない（最高画質）
    Yuv444,
    /// 4:2:2 - 水平方向のみ半分
    Yuv422,
    /// 4:2:0 - 水平・垂直とも半分
    Yuv420,
}

impl ChromaSubsampling {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yuv444 => "4:4:4",
            Self::Yuv422 => "4:2:2",
            Self::Yuv420 => "4:2:0",
        }
    }
}

impl FromStr for ChromaSubsampling {
    type Err = ConvertError;

    // "0"/"1"/"2" は従来のコマンドライン表記
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4:4:4" | "444" | "0" => Ok(Self::Yuv444),
            "4:2:2" | "422" | "1" => Ok(Self::Yuv422),
            "4:2:0" | "420" | "2" => Ok(Self::Yuv420),
            other => Err(ConvertError::configuration(format!(
                "不正なサブサンプリング指定: '{other}' (4:4:4, 4:2:2, 4:2:0 のいずれか)"
            ))),
        }
    }
}

impl TryFrom<String> for ChromaSubsampling {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChromaSubsampling> for String {
    fn from(subsampling: ChromaSubsampling) -> Self {
        subsampling.as_str().to_string()
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// バッチ変換の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub format: OutputFormat,
    pub quality: u8,
    pub subsampling: ChromaSubsampling,
    pub progressive: bool,
    pub optimize: bool,
    pub preserve_metadata: bool,
    pub recursive: bool,
    pub overwrite: bool,
    /// 0以下は自動決定
    pub workers: i32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: 95,
            subsampling: ChromaSubsampling::Yuv444,
            progressive: true,
            optimize: true,
            preserve_metadata: true,
            recursive: true,
            overwrite: false,
            workers: 0,
        }
    }
}

impl ConversionOptions {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_subsampling(mut self, subsampling: ChromaSubsampling) -> Self {
        self.subsampling = subsampling;
        self
    }

    pub fn with_progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_workers(mut self, workers: i32) -> Self {
        self.workers = workers;
        self
    }

    /// 設定の検証（ファイル処理開始前に一度だけ呼ばれる）
    ///
    /// 品質はJPEGでのみ使われるため、PNG出力では範囲外でも受け付ける。
    pub fn validate(&self) -> ConvertResult<()> {
        if self.format == OutputFormat::Jpeg && !(1..=100).contains(&self.quality) {
            return Err(ConvertError::configuration(format!(
                "品質は1から100の範囲で指定してください: {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// 品質指定が推奨範囲を超えているか（JPEGのみ）
    pub fn exceeds_recommended_quality(&self) -> bool {
        self.format == OutputFormat::Jpeg && self.quality > QUALITY_WARNING_THRESHOLD
    }

    /// 実際に使用するワーカー数
    pub fn resolve_workers(&self) -> usize {
        if self.workers <= 0 {
            num_cpus::get().clamp(1, MAX_AUTO_WORKERS)
        } else {
            self.workers as usize
        }
    }
}
