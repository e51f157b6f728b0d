use clap::Parser;
use heic_convert::{
    cli::{execute_convert, Cli},
    decoder, logging,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // HEIFサポートはプロセス終了まで有効にしておく
    let _heif = decoder::initialize();

    match execute_convert(cli).await {
        Ok(summary) => {
            if summary.has_errors() {
                println!("⚠️  {}個のファイルでエラーが発生しました", summary.errors);
            }
        }
        Err(error) => {
            eprintln!("❌ エラー: {error:#}");
            std::process::exit(1);
        }
    }
}
