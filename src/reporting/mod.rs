// 進捗報告の実装とサマリーレポート出力

pub mod console;
pub mod report;

pub use console::{ConsoleProgressReporter, NoOpProgressReporter};
pub use report::{write_report, BatchReport};
