// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod options;
pub mod traits;
pub mod types;

// 公開API
pub use error::{ConvertError, ConvertResult, ErrorSeverity};
pub use options::{ChromaSubsampling, ConversionOptions, OutputFormat};
pub use traits::ProgressReporter;
pub use types::{
    BatchSummary, ConversionJob, ConversionMetadata, ConversionOutcome, FileFailure, FileTask,
};
