//! 単一ファイル変換
//!
//! 1. デコード
//! 2. EXIFの向きを画素に適用（タグが無ければ何もしない）
//! 3. メタデータ保持が有効ならEXIF/ICCを取り出す
//! 4. 出力形式ごとのエンコード（一時ファイルに書いてからリネーム）

pub mod jpeg;
pub mod png;

use crate::core::{
    ConversionMetadata, ConversionOptions, ConvertError, ConvertResult, OutputFormat,
};
use crate::decoder::{DecodedImage, SourceDecoder};
use crate::metadata::{read_orientation, reset_orientation};
use image::metadata::Orientation;
use image::DynamicImage;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// デコーダーと共有設定を束ねた変換器
///
/// ワーカー間で `Arc<ImageConverter<D>>` として共有される。
#[derive(Debug, Clone)]
pub struct ImageConverter<D> {
    decoder: D,
    options: ConversionOptions,
}

impl<D: SourceDecoder> ImageConverter<D> {
    pub fn new(decoder: D, options: ConversionOptions) -> Self {
        Self { decoder, options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// 1ファイルを変換して `output` に書き出す（既存ファイルは上書き）
    pub fn convert(&self, input: &Path, output: &Path) -> ConvertResult<ConversionMetadata> {
        let start_time = Instant::now();

        let DecodedImage {
            mut image,
            mut exif,
            icc_profile,
        } = self.decoder.decode(input)?;

        let orientation_applied = apply_exif_orientation(&mut image, exif.as_mut());

        let (exif, icc_profile) = if self.options.preserve_metadata {
            (exif, icc_profile)
        } else {
            (None, None)
        };

        let (exif_embedded, icc_embedded) =
            self.write_atomically(&image, exif.as_deref(), icc_profile.as_deref(), output)?;

        let output_bytes = fs::metadata(output).map(|m| m.len()).unwrap_or_default();

        Ok(ConversionMetadata {
            dimensions: (image.width(), image.height()),
            orientation_applied,
            exif_embedded,
            icc_embedded,
            output_bytes,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn write_atomically(
        &self,
        image: &DynamicImage,
        exif: Option<&[u8]>,
        icc_profile: Option<&[u8]>,
        output: &Path,
    ) -> ConvertResult<(bool, bool)> {
        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".heic_convert-")
            .suffix(".partial")
            .tempfile_in(parent)
            .map_err(|e| ConvertError::io(parent, e))?;

        let embedded = {
            let mut writer = BufWriter::new(temp.as_file_mut());
            let embedded = match self.options.format {
                OutputFormat::Jpeg => {
                    let meta = jpeg::encode(&mut writer, image, exif, icc_profile, &self.options, output)?;
                    (meta.exif, meta.icc)
                }
                OutputFormat::Png => (false, png::encode(&mut writer, image, icc_profile, output)?),
            };
            writer.flush().map_err(|e| ConvertError::io(output, e))?;
            embedded
        };

        // NamedTempFile は 0600 で作られるため通常のファイル権限に戻す
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(|e| ConvertError::io(output, e))?;
        }

        temp.persist(output)
            .map_err(|e| ConvertError::io(output, e.error))?;

        Ok(embedded)
    }
}

/// EXIFの向きを画素に適用し、適用した場合はタグを1に戻す
fn apply_exif_orientation(image: &mut DynamicImage, exif: Option<&mut Vec<u8>>) -> bool {
    let Some(tiff) = exif else {
        return false;
    };

    match read_orientation(tiff) {
        None | Some(Orientation::NoTransforms) => false,
        Some(orientation) => {
            image.apply_orientation(orientation);
            reset_orientation(tiff);
            true
        }
    }
}
