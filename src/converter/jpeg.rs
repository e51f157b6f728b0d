// JPEGエンコード

use crate::core::{ChromaSubsampling, ConversionOptions, ConvertError, ConvertResult};
use crate::metadata::jpeg_app1_payload;
use image::DynamicImage;
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use std::io::Write;
use std::path::Path;

/// 1つのAPPセグメントに格納できる最大データ長
const MAX_APP_SEGMENT_LEN: usize = 65533;

/// 埋め込まれたメタデータ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddedMetadata {
    pub exif: bool,
    pub icc: bool,
}

fn sampling_factor(subsampling: ChromaSubsampling) -> SamplingFactor {
    match subsampling {
        ChromaSubsampling::Yuv444 => SamplingFactor::R_4_4_4,
        ChromaSubsampling::Yuv422 => SamplingFactor::R_4_2_2,
        ChromaSubsampling::Yuv420 => SamplingFactor::R_4_2_0,
    }
}

/// RGB（アルファなし）に変換してJPEGを書き出す
pub fn encode<W: Write>(
    writer: W,
    image: &DynamicImage,
    exif: Option<&[u8]>,
    icc_profile: Option<&[u8]>,
    options: &ConversionOptions,
    output: &Path,
) -> ConvertResult<EmbeddedMetadata> {
    // JPEGはアルファを持てない
    let rgb = image.to_rgb8();
    let width = u16::try_from(rgb.width())
        .map_err(|_| ConvertError::encode(output, format!("JPEGの最大幅を超えています: {}", rgb.width())))?;
    let height = u16::try_from(rgb.height())
        .map_err(|_| ConvertError::encode(output, format!("JPEGの最大高さを超えています: {}", rgb.height())))?;

    let mut encoder = Encoder::new(writer, options.quality);
    encoder.set_sampling_factor(sampling_factor(options.subsampling));
    encoder.set_progressive(options.progressive);
    encoder.set_optimized_huffman_tables(options.optimize);

    let mut embedded = EmbeddedMetadata::default();

    if let Some(tiff) = exif {
        let payload = jpeg_app1_payload(tiff);
        if payload.len() > MAX_APP_SEGMENT_LEN {
            tracing::warn!(
                output = %output.display(),
                bytes = payload.len(),
                "EXIF too large for a single APP1 segment, dropping it"
            );
        } else {
            encoder
                .add_app_segment(1, &payload)
                .map_err(|e| ConvertError::encode(output, e))?;
            embedded.exif = true;
        }
    }

    if let Some(icc) = icc_profile {
        encoder
            .add_icc_profile(icc)
            .map_err(|e| ConvertError::encode(output, e))?;
        embedded.icc = true;
    }

    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| ConvertError::encode(output, e))?;

    Ok(embedded)
}
