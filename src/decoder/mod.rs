use crate::core::ConvertResult;
use image::DynamicImage;
use mockall::automock;
use std::path::Path;

#[cfg(feature = "heif")]
pub mod heif;
pub mod standard;

#[cfg(feature = "heif")]
pub use heif::{initialize, HeifDecoder as DefaultDecoder, HeifRuntime};
#[cfg(not(feature = "heif"))]
pub use standard::StandardDecoder as DefaultDecoder;

/// デコード結果
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// デコードされた画素データ
    pub image: DynamicImage,
    /// TIFFヘッダ始まりに正規化されたEXIF
    pub exif: Option<Vec<u8>>,
    /// ICCプロファイル
    pub icc_profile: Option<Vec<u8>>,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            exif: None,
            icc_profile: None,
        }
    }

    pub fn with_exif(mut self, exif: Vec<u8>) -> Self {
        self.exif = Some(exif);
        self
    }

    pub fn with_icc_profile(mut self, icc_profile: Vec<u8>) -> Self {
        self.icc_profile = Some(icc_profile);
        self
    }
}

/// 入力画像デコーダーのトレイト
///
/// ワーカースレッドから同時に呼ばれるため `Send + Sync` が必要。
/// 処理はブロッキングで、呼び出し側が `spawn_blocking` で実行する。
#[automock]
pub trait SourceDecoder: Send + Sync {
    /// ファイルパスから画像とメタデータを読み込む
    fn decode(&self, path: &Path) -> ConvertResult<DecodedImage>;

    /// バックエンド名
    fn backend_name(&self) -> &'static str;
}

impl SourceDecoder for Box<dyn SourceDecoder> {
    fn decode(&self, path: &Path) -> ConvertResult<DecodedImage> {
        self.as_ref().decode(path)
    }

    fn backend_name(&self) -> &'static str {
        self.as_ref().backend_name()
    }
}

/// HEIFサポートが無効なビルドでは何もしない
#[cfg(not(feature = "heif"))]
pub fn initialize() {}
