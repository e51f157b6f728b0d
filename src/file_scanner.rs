use crate::core::{ConvertError, ConvertResult, FileTask};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 変換対象として認識する拡張子（小文字）
pub const INPUT_EXTENSIONS: &[&str] = &["heic", "heif"];

pub struct FileScanner {
    root: PathBuf,
    recursive: bool,
}

impl FileScanner {
    /// 入力ルートを検証してスキャナーを作成
    pub fn new(root: impl AsRef<Path>, recursive: bool) -> ConvertResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConvertError::source_not_found(root));
        }

        let root = std::path::absolute(root).map_err(|e| ConvertError::io(root, e))?;
        Ok(Self { root, recursive })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 入力ファイルを遅延列挙する
    ///
    /// 順序はファイルシステムの列挙順に従い、ソートはしない。
    pub fn scan(self) -> impl Iterator<Item = FileTask> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let root = self.root;

        WalkDir::new(&root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    tracing::warn!(%error, "skipping unreadable entry");
                    None
                }
            })
            .filter(is_regular_file)
            .filter(|entry| Self::is_input_file(entry.path()))
            .filter_map(move |entry| {
                let relative = entry.path().strip_prefix(&root).ok()?.to_path_buf();
                Some(FileTask::new(entry.into_path(), relative))
            })
    }

    /// 入力ルートを走査して全件を収集
    pub fn scan_directory(root: impl AsRef<Path>, recursive: bool) -> ConvertResult<Vec<FileTask>> {
        Ok(Self::new(root, recursive)?.scan().collect())
    }

    pub fn is_input_file(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext.as_str()))
    }
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_directory() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        fs::write(temp_path.join("image1.heic"), b"dummy").unwrap();
        fs::write(temp_path.join("image2.HEIF"), b"dummy").unwrap();
        fs::write(temp_path.join("photo.jpg"), b"dummy").unwrap();
        fs::write(temp_path.join("document.txt"), b"dummy").unwrap();

        let result = FileScanner::scan_directory(temp_path, true).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().any(|t| t.relative == Path::new("image1.heic")));
        assert!(result.iter().any(|t| t.relative == Path::new("image2.HEIF")));
        assert!(result.iter().all(|t| t.input.is_absolute()));
    }

    #[test]
    fn test_non_recursive_only_lists_direct_children() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        fs::write(temp_dir.path().join("top.heic"), b"dummy").unwrap();
        fs::write(nested.join("deep.heic"), b"dummy").unwrap();

        let flat = FileScanner::scan_directory(temp_dir.path(), false).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].relative, PathBuf::from("top.heic"));

        let deep = FileScanner::scan_directory(temp_dir.path(), true).unwrap();
        assert_eq!(deep.len(), 2);
        assert!(deep.iter().any(|t| t.relative == Path::new("a/b/deep.heic")));
    }

    #[test]
    fn test_directory_with_image_extension_is_ignored() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("album.heic")).unwrap();

        let result = FileScanner::scan_directory(temp_dir.path(), true).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_root_is_source_not_found() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing");

        let result = FileScanner::new(&missing, true);
        assert!(matches!(result, Err(ConvertError::SourceNotFound { .. })));
    }

    #[test]
    fn test_file_root_is_source_not_found() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("single.heic");
        fs::write(&file, b"dummy").unwrap();

        assert!(matches!(
            FileScanner::new(&file, false),
            Err(ConvertError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_is_input_file() {
        assert!(FileScanner::is_input_file(Path::new("a.heic")));
        assert!(FileScanner::is_input_file(Path::new("a.HeIf")));
        assert!(!FileScanner::is_input_file(Path::new("a.jpg")));
        assert!(!FileScanner::is_input_file(Path::new("heic")));
    }
}
