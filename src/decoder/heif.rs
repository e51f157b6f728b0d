use super::{DecodedImage, SourceDecoder};
use crate::core::{ConvertError, ConvertResult};
use crate::metadata::{normalize_exif, reset_orientation};
use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, ImageHandle, ItemId, LibHeif, RgbChroma};
use std::path::Path;

/// プロセス全体でlibheifを初期化状態に保つガード
///
/// `main` の冒頭で一度だけ作成し、プロセス終了まで保持する。
pub struct HeifRuntime {
    _lib: LibHeif,
}

/// HEIF/HEICサポートの初期化
pub fn initialize() -> HeifRuntime {
    tracing::debug!("initializing libheif");
    HeifRuntime {
        _lib: LibHeif::new(),
    }
}

/// libheif によるHEIF/HEICデコーダー
///
/// libheif はデコード時にコンテナの回転・反転（irot/imir）を適用するため、
/// 出力画素は既に正立している。二重回転を避けるためEXIFの向きタグは1に戻す。
#[derive(Clone, Debug, Default)]
pub struct HeifDecoder;

impl HeifDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl SourceDecoder for HeifDecoder {
    fn decode(&self, path: &Path) -> ConvertResult<DecodedImage> {
        // ファイル名がUTF-8でなくても読めるようにバイト列で渡す
        let data = std::fs::read(path).map_err(|e| ConvertError::io(path, e))?;

        // 参照カウント方式のため、initialize() 済みなら追加コストはほぼ無い
        let lib = LibHeif::new();
        let context =
            HeifContext::read_from_bytes(&data).map_err(|e| ConvertError::decode(path, e))?;
        let handle = context
            .primary_image_handle()
            .map_err(|e| ConvertError::decode(path, e))?;

        let has_alpha = handle.has_alpha_channel();
        let chroma = if has_alpha {
            RgbChroma::Rgba
        } else {
            RgbChroma::Rgb
        };

        let decoded = lib
            .decode(&handle, ColorSpace::Rgb(chroma), None)
            .map_err(|e| ConvertError::decode(path, e))?;
        let planes = decoded.planes();
        let plane = planes
            .interleaved
            .ok_or_else(|| ConvertError::decode(path, "インターリーブ画素データがありません"))?;

        let image = interleaved_to_image(plane.data, plane.stride, plane.width, plane.height, has_alpha)
            .ok_or_else(|| ConvertError::decode(path, "画素バッファのサイズが不正です"))?;

        let exif = read_exif_block(&handle)
            .and_then(|raw| normalize_exif(&raw))
            .map(|mut tiff| {
                reset_orientation(&mut tiff);
                tiff
            });
        let icc_profile = handle.color_profile_raw().map(|profile| profile.data);

        Ok(DecodedImage {
            image,
            exif,
            icc_profile,
        })
    }

    fn backend_name(&self) -> &'static str {
        "libheif"
    }
}

fn read_exif_block(handle: &ImageHandle) -> Option<Vec<u8>> {
    let mut ids: Vec<ItemId> = vec![0; 1];
    let count = handle.metadata_block_ids(&mut ids, b"Exif");
    if count == 0 {
        return None;
    }

    match handle.metadata(ids[0]) {
        Ok(data) => Some(data),
        Err(error) => {
            tracing::warn!(%error, "failed to read EXIF block");
            None
        }
    }
}

/// ストライド付きのインターリーブ画素を詰めて `DynamicImage` にする
fn interleaved_to_image(
    data: &[u8],
    stride: usize,
    width: u32,
    height: u32,
    has_alpha: bool,
) -> Option<DynamicImage> {
    let channels = if has_alpha { 4 } else { 3 };
    let row_len = width as usize * channels;
    if stride == 0 || stride < row_len {
        return None;
    }

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in data.chunks(stride).take(height as usize) {
        pixels.extend_from_slice(row.get(..row_len)?);
    }

    if has_alpha {
        RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
    }
}
