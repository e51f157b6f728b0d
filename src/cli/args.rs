use crate::core::ChromaSubsampling;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heic_convert")]
#[command(about = "Batch convert HEIC/HEIF images to JPEG or PNG")]
#[command(version)]
pub struct Cli {
    /// Source directory containing HEIC/HEIF files
    #[arg(default_value = "fotos_heic")]
    pub source: PathBuf,

    /// Destination directory for converted images
    #[arg(default_value = "fotos_jpeg")]
    pub dest: PathBuf,

    /// Output format (jpeg or png)
    #[arg(short, long)]
    pub format: Option<String>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// JPEG chroma subsampling
    #[arg(short, long, value_enum)]
    pub subsampling: Option<SubsamplingArg>,

    /// Disable progressive JPEG encoding
    #[arg(long)]
    pub no_progressive: bool,

    /// Disable Huffman table optimization
    #[arg(long)]
    pub no_optimize: bool,

    /// Do not preserve ICC profile or EXIF metadata
    #[arg(long)]
    pub no_metadata: bool,

    /// Do not descend into subdirectories
    #[arg(long)]
    pub no_recursive: bool,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Number of worker threads (0 = auto)
    #[arg(short, long)]
    pub threads: Option<i32>,

    /// Load options from a JSON file (explicit flags take precedence)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a JSON summary report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Suppress progress output on the console
    #[arg(long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubsamplingArg {
    /// 4:4:4 (no subsampling)
    #[value(name = "444", alias = "0")]
    Yuv444,
    /// 4:2:2
    #[value(name = "422", alias = "1")]
    Yuv422,
    /// 4:2:0
    #[value(name = "420", alias = "2")]
    Yuv420,
}

impl From<SubsamplingArg> for ChromaSubsampling {
    fn from(arg: SubsamplingArg) -> Self {
        match arg {
            SubsamplingArg::Yuv444 => ChromaSubsampling::Yuv444,
            SubsamplingArg::Yuv422 => ChromaSubsampling::Yuv422,
            SubsamplingArg::Yuv420 => ChromaSubsampling::Yuv420,
        }
    }
}
