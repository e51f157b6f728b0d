// ログ出力の初期化

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "heic_convert=info";
const VERBOSE_FILTER: &str = "heic_convert=debug";

/// `RUST_LOG` が無い場合に使うフィルタ
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// tracing-subscriber を初期化する（プロセスで一度だけ）
///
/// ログは標準エラーへ出力し、標準出力はコンソール表示に使う。
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // テストなどで既に初期化済みの場合は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
