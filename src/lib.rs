//! HEIC/HEIF 画像を JPEG または PNG へ一括変換するライブラリ
//!
//! 入力ディレクトリを走査し、相対パスを保ったまま出力ディレクトリへ
//! 並列に変換する。EXIF の向きは画素に適用され、ICC プロファイルと
//! EXIF は出力形式が許す範囲で保持される。
//!
//! ```no_run
//! use heic_convert::{convert_directory, ConversionOptions, OutputFormat};
//!
//! # async fn run() -> heic_convert::ConvertResult<()> {
//! let options = ConversionOptions::default().with_format(OutputFormat::Png);
//! let summary = convert_directory("fotos_heic", "fotos_png", options).await?;
//! println!("{} converted, {} errors", summary.converted, summary.errors);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod converter;
pub mod core;
pub mod decoder;
pub mod engine;
pub mod file_scanner;
pub mod logging;
pub mod metadata;
pub mod reporting;

pub use crate::core::{
    BatchSummary, ChromaSubsampling, ConversionOptions, ConvertError, ConvertResult,
    OutputFormat, ProgressReporter,
};
pub use converter::ImageConverter;
pub use decoder::{DecodedImage, DefaultDecoder, SourceDecoder};
pub use engine::{convert_directory, BatchConverter};
pub use file_scanner::FileScanner;
