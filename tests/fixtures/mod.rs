// 統合テスト用のフィクスチャ
// 「HEIC」ファイルの中身はPNG/JPEGで、StandardDecoder が内容から判定する

#![allow(dead_code)]

use heic_convert::converter::jpeg;
use heic_convert::ConversionOptions;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// IFD0に向きタグだけを持つリトルエンディアンのTIFFブロブ
pub fn exif_with_orientation(orientation: u16) -> Vec<u8> {
    let mut tiff = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    tiff.extend_from_slice(&1u16.to_le_bytes()); // エントリ数
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes()); // 次のIFDなし
    tiff
}

/// 左半分が赤、右半分が青の画像
pub fn two_tone_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    }))
}

/// PNGの中身を持つ偽HEICファイルを作成
pub fn write_fake_heic(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    two_tone_image(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// EXIFの向きタグ付きJPEGの中身を持つ偽HEICファイルを作成
pub fn write_fake_heic_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let exif = exif_with_orientation(orientation);
    let mut buffer = Vec::new();
    jpeg::encode(
        &mut buffer,
        &two_tone_image(width, height),
        Some(&exif),
        None,
        &ConversionOptions::default(),
        path,
    )
    .unwrap();
    fs::write(path, buffer).unwrap();
}

/// 壊れた入力ファイルを作成
pub fn write_corrupted_heic(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"ftypheic but not really an image").unwrap();
}

/// ディレクトリ以下の全ファイルを相対パスで列挙（ソート済み）
pub fn list_relative_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
