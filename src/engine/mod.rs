// エンジン層 - 並列変換とバッチのオーケストレーション
// Producer / Consumer / Collector をパイプラインで組み合わせる

pub mod batch;
pub mod collector;
pub mod consumer;
mod pipeline;
pub mod producer;

pub use batch::{convert_directory, BatchConverter};
pub use collector::CollectedResults;
pub use pipeline::ConversionPipeline;
