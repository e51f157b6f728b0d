// PNGエンコード（可逆）

use crate::core::{ConvertError, ConvertResult};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// PNGを書き出す。EXIFは書き込まず、ICCプロファイルのみ埋め込む。
///
/// 戻り値はICCプロファイルが埋め込まれたかどうか。
pub fn encode<W: Write>(
    writer: W,
    image: &DynamicImage,
    icc_profile: Option<&[u8]>,
    output: &Path,
) -> ConvertResult<bool> {
    let mut encoder = PngEncoder::new(writer);

    let mut icc_embedded = false;
    if let Some(icc) = icc_profile {
        match encoder.set_icc_profile(icc.to_vec()) {
            Ok(()) => icc_embedded = true,
            Err(error) => {
                tracing::warn!(output = %output.display(), %error, "ICC profile not embedded");
            }
        }
    }

    // PNGが扱えない浮動小数点形式は16bitに落とす
    let image = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16()))
        }
        other => Cow::Borrowed(other),
    };

    image
        .write_with_encoder(encoder)
        .map_err(|e| ConvertError::encode(output, e))?;

    Ok(icc_embedded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageDecoder, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_png_keeps_alpha_losslessly() {
        let source = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 4]));
        let mut bytes = Vec::new();

        encode(
            &mut bytes,
            &DynamicImage::ImageRgba8(source.clone()),
            None,
            Path::new("out.png"),
        )
        .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.to_rgba8(), source);
    }

    #[test]
    fn test_png_embeds_icc_profile() {
        let icc = vec![3u8; 64];
        let mut bytes = Vec::new();

        let embedded = encode(
            &mut bytes,
            &DynamicImage::new_rgb8(2, 2),
            Some(&icc),
            Path::new("out.png"),
        )
        .unwrap();
        assert!(embedded);

        let mut decoder = image::codecs::png::PngDecoder::new(Cursor::new(&bytes)).unwrap();
        assert_eq!(decoder.icc_profile().unwrap(), Some(icc));
    }

    #[test]
    fn test_float_images_are_converted() {
        let mut bytes = Vec::new();
        encode(
            &mut bytes,
            &DynamicImage::new_rgb32f(2, 2),
            None,
            Path::new("out.png"),
        )
        .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba16);
    }
}
