// 画像メタデータ（EXIF）の取り扱い

pub mod exif;

pub use exif::{jpeg_app1_payload, normalize_exif, read_orientation, reset_orientation};
