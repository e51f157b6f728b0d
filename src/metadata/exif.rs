//! EXIFブロブの正規化と向きタグの操作
//!
//! 内部ではEXIFを常にTIFFヘッダ（`II*\0` / `MM\0*`）から始まる形で保持する。
//! HEIFのメタデータブロックは先頭4バイトにTIFFヘッダまでのオフセットを持ち、
//! JPEGのAPP1セグメントは `Exif\0\0` を前置する。

use image::metadata::Orientation;

/// JPEG APP1 セグメントのEXIF識別子
pub const EXIF_HEADER: &[u8] = b"Exif\0\0";

const ORIENTATION_TAG: u16 = 0x0112;
const TIFF_TYPE_SHORT: u16 = 3;

/// 様々な形式のEXIFデータをTIFFヘッダ始まりに正規化
pub fn normalize_exif(raw: &[u8]) -> Option<Vec<u8>> {
    if is_tiff_header(raw) {
        return Some(raw.to_vec());
    }

    if let Some(rest) = raw.strip_prefix(EXIF_HEADER) {
        return is_tiff_header(rest).then(|| rest.to_vec());
    }

    // HEIF: 4バイトのビッグエンディアンオフセット + (Exif\0\0) + TIFF
    let offset = u32::from_be_bytes(raw.get(0..4)?.try_into().ok()?) as usize;
    let rest = raw.get(4usize.checked_add(offset)?..)?;
    let rest = rest.strip_prefix(EXIF_HEADER).unwrap_or(rest);
    is_tiff_header(rest).then(|| rest.to_vec())
}

/// IFD0の向きタグを読み取る
pub fn read_orientation(tiff: &[u8]) -> Option<Orientation> {
    let (offset, little_endian) = orientation_value_offset(tiff)?;
    let value = read_u16(tiff, offset, little_endian)?;
    Orientation::from_exif(u8::try_from(value).ok()?)
}

/// 向きタグを1（回転なし）に書き換える。タグが無ければ何もしない。
pub fn reset_orientation(tiff: &mut [u8]) -> bool {
    let Some((offset, little_endian)) = orientation_value_offset(tiff) else {
        return false;
    };

    let bytes = if little_endian {
        1u16.to_le_bytes()
    } else {
        1u16.to_be_bytes()
    };
    tiff[offset..offset + 2].copy_from_slice(&bytes);
    true
}

/// JPEG APP1 セグメント用のペイロードを作成
pub fn jpeg_app1_payload(tiff: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(EXIF_HEADER.len() + tiff.len());
    payload.extend_from_slice(EXIF_HEADER);
    payload.extend_from_slice(tiff);
    payload
}

fn is_tiff_header(data: &[u8]) -> bool {
    matches!(
        data.get(0..4),
        Some([0x49, 0x49, 0x2A, 0x00]) | Some([0x4D, 0x4D, 0x00, 0x2A])
    )
}

/// 向きタグの値フィールドの位置とエンディアン
fn orientation_value_offset(tiff: &[u8]) -> Option<(usize, bool)> {
    let little_endian = match tiff.get(0..4)? {
        [0x49, 0x49, 0x2A, 0x00] => true,
        [0x4D, 0x4D, 0x00, 0x2A] => false,
        _ => return None,
    };

    let ifd0 = read_u32(tiff, 4, little_endian)? as usize;
    let entry_count = read_u16(tiff, ifd0, little_endian)? as usize;

    for index in 0..entry_count {
        let entry = ifd0 + 2 + index * 12;
        if read_u16(tiff, entry, little_endian)? != ORIENTATION_TAG {
            continue;
        }
        if read_u16(tiff, entry + 2, little_endian)? != TIFF_TYPE_SHORT {
            return None;
        }
        let value_offset = entry + 8;
        tiff.get(value_offset..value_offset + 2)?;
        return Some((value_offset, little_endian));
    }

    None
}

fn read_u16(data: &[u8], offset: usize, little_endian: bool) -> Option<u16> {
    let bytes: [u8; 2] = data.get(offset..offset.checked_add(2)?)?.try_into().ok()?;
    Some(if little_endian {
        u16::from_le_bytes(bytes)
    } else {
        u16::from_be_bytes(bytes)
    })
}

fn read_u32(data: &[u8], offset: usize, little_endian: bool) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
    Some(if little_endian {
        u32::from_le_bytes(bytes)
    } else {
        u32::from_be_bytes(bytes)
    })
}

/// テスト用の最小TIFF（IFD0に向きタグのみ）
#[cfg(test)]
pub(crate) fn tiff_with_orientation(orientation: u16, little_endian: bool) -> Vec<u8> {
    let u16_bytes = |v: u16| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };
    let u32_bytes = |v: u32| {
        if little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };

    let mut tiff = Vec::new();
    tiff.extend_from_slice(if little_endian { b"II" } else { b"MM" });
    tiff.extend_from_slice(&u16_bytes(42));
    tiff.extend_from_slice(&u32_bytes(8));
    tiff.extend_from_slice(&u16_bytes(1));
    tiff.extend_from_slice(&u16_bytes(ORIENTATION_TAG));
    tiff.extend_from_slice(&u16_bytes(TIFF_TYPE_SHORT));
    tiff.extend_from_slice(&u32_bytes(1));
    tiff.extend_from_slice(&u16_bytes(orientation));
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&u32_bytes(0));
    tiff
}
