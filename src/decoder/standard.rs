use super::{DecodedImage, SourceDecoder};
use crate::core::{ConvertError, ConvertResult};
use crate::metadata::normalize_exif;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::path::Path;

/// `image` クレートによる標準デコーダー
///
/// 拡張子ではなくファイル内容から形式を判定する。
#[derive(Clone, Debug, Default)]
pub struct StandardDecoder;

impl StandardDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl SourceDecoder for StandardDecoder {
    fn decode(&self, path: &Path) -> ConvertResult<DecodedImage> {
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| ConvertError::decode(path, e))?;

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ConvertError::decode(path, e))?;

        // メタデータの読み取り失敗は画像自体の失敗とはしない
        let icc_profile = decoder.icc_profile().ok().flatten();
        let exif = decoder
            .exif_metadata()
            .ok()
            .flatten()
            .and_then(|raw| normalize_exif(&raw));

        let image = DynamicImage::from_decoder(decoder).map_err(|e| ConvertError::decode(path, e))?;

        Ok(DecodedImage {
            image,
            exif,
            icc_profile,
        })
    }

    fn backend_name(&self) -> &'static str {
        "image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_decode_sniffs_content_not_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("disguised.heic");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let decoded = StandardDecoder::new().decode(&path).unwrap();

        assert_eq!((decoded.image.width(), decoded.image.height()), (3, 2));
        assert!(decoded.exif.is_none());
    }

    #[test]
    fn test_decode_corrupted_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupted.heic");
        std::fs::write(&path, b"NOT_AN_IMAGE").unwrap();

        let error = StandardDecoder::new().decode(&path).unwrap_err();

        assert!(matches!(error, ConvertError::Decode { .. }));
        assert!(error.to_string().contains("corrupted.heic"));
    }

    #[test]
    fn test_decode_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let error = StandardDecoder::new()
            .decode(&temp_dir.path().join("missing.heic"))
            .unwrap_err();

        assert!(matches!(error, ConvertError::Decode { .. }));
    }
}
