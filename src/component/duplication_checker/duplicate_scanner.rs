use crate::component::input_normalizer::{EntryKind, resolve_unique_target};
use crate::tools::{DuplicateCheck, FingerprintIndex, ensure_directory_exists};
use anyhow::{Context, Result, anyhow};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// 重複檔案移動到的子資料夾名稱
pub const DUPLICATION_DIR_NAME: &str = "duplication_file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub duplicate: PathBuf,
    pub original: PathBuf,
}

#[derive(Debug, Default)]
pub struct DuplicateScanResult {
    pub total_files: usize,
    pub pairs: Vec<DuplicatePair>,
    /// 無法計算指紋（讀取失敗或空檔案）
    pub unfingerprintable: usize,
    pub cancelled: bool,
}

#[derive(Debug, Default)]
pub struct DuplicateMoveResult {
    /// (原路徑, 新路徑)
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub errors: usize,
}

/// 依序檢查檔案，先出現者視為原始檔
pub fn find_duplicates(files: &[PathBuf], shutdown_signal: &AtomicBool) -> DuplicateScanResult {
    let mut index = FingerprintIndex::new();
    let mut result = DuplicateScanResult {
        total_files: files.len(),
        ..DuplicateScanResult::default()
    };

    for path in files {
        if shutdown_signal.load(Ordering::SeqCst) {
            result.cancelled = true;
            break;
        }

        match index.check(path) {
            DuplicateCheck::Duplicate { original } => result.pairs.push(DuplicatePair {
                duplicate: path.clone(),
                original,
            }),
            DuplicateCheck::Unfingerprintable => result.unfingerprintable += 1,
            DuplicateCheck::New => {}
        }
    }

    info!(
        "重複檢查完成 - 總計: {}, 重複: {}",
        result.total_files,
        result.pairs.len()
    );
    result
}

/// 將重複檔案移到 `<directory>/duplication_file/`，名稱衝突時加上 `_N`
///
/// 無法建立資料夾時回傳錯誤；單一檔案移動失敗只計數
pub fn move_duplicates(pairs: &[DuplicatePair], directory: &Path) -> Result<DuplicateMoveResult> {
    let duplication_directory = directory.join(DUPLICATION_DIR_NAME);
    ensure_directory_exists(&duplication_directory)?;

    let mut result = DuplicateMoveResult::default();
    for pair in pairs {
        match move_to_duplication_folder(&pair.duplicate, &duplication_directory) {
            Ok(dest_path) => result.moved.push((pair.duplicate.clone(), dest_path)),
            Err(e) => {
                error!("{e:#}");
                result.errors += 1;
            }
        }
    }

    Ok(result)
}

fn move_to_duplication_folder(path: &Path, duplication_directory: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("無法取得檔案名稱: {}", path.display()))?;

    let dest_path = resolve_unique_target(&duplication_directory.join(file_name), EntryKind::File);

    fs::rename(path, &dest_path).with_context(|| {
        format!(
            "無法移動重複檔案: {} -> {}",
            path.display(),
            dest_path.display()
        )
    })?;

    info!("移動重複檔案: {} -> {}", path.display(), dest_path.display());
    Ok(dest_path)
}

/// 掃描時略過已移入重複資料夾的檔案
#[must_use]
pub fn is_in_duplication_folder(path: &Path, directory: &Path) -> bool {
    path.starts_with(directory.join(DUPLICATION_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_find_duplicates_pairs_with_first_seen() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.mp4", b"same content");
        let b = write(temp_dir.path(), "b.mp4", b"other");
        let c = write(temp_dir.path(), "c.mp4", b"same content");
        let empty = write(temp_dir.path(), "d.mp4", b"");

        let result = find_duplicates(&[a.clone(), b, c.clone(), empty], &AtomicBool::new(false));

        assert_eq!(result.total_files, 4);
        assert_eq!(
            result.pairs,
            vec![DuplicatePair {
                duplicate: c,
                original: a
            }]
        );
        assert_eq!(result.unfingerprintable, 1);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_find_duplicates_honors_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.mp4", b"x");

        let result = find_duplicates(&[a], &AtomicBool::new(true));
        assert!(result.cancelled);
        assert!(result.pairs.is_empty());
    }

    #[test]
    fn test_move_duplicates_with_collision() {
        let temp_dir = TempDir::new().unwrap();
        let original = write(temp_dir.path(), "clip.mp4", b"same");
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let duplicate = write(&sub, "clip.mp4", b"same");

        let dup_dir = temp_dir.path().join(DUPLICATION_DIR_NAME);
        fs::create_dir(&dup_dir).unwrap();
        fs::write(dup_dir.join("clip.mp4"), b"earlier run").unwrap();

        let pairs = vec![DuplicatePair {
            duplicate: duplicate.clone(),
            original: original.clone(),
        }];
        let result = move_duplicates(&pairs, temp_dir.path()).unwrap();

        assert_eq!(result.errors, 0);
        assert_eq!(
            result.moved,
            vec![(duplicate.clone(), dup_dir.join("clip_1.mp4"))]
        );
        assert!(!duplicate.exists());
        assert!(original.exists());
        assert!(is_in_duplication_folder(
            &dup_dir.join("clip_1.mp4"),
            temp_dir.path()
        ));
    }

    #[test]
    fn test_move_missing_file_counts_error() {
        let temp_dir = TempDir::new().unwrap();
        let pairs = vec![DuplicatePair {
            duplicate: temp_dir.path().join("gone.mp4"),
            original: temp_dir.path().join("orig.mp4"),
        }];

        let result = move_duplicates(&pairs, temp_dir.path()).unwrap();
        assert_eq!(result.errors, 1);
        assert!(result.moved.is_empty());
    }
}
