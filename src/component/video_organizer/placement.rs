//! 將檔案放到計算好的目的地

use crate::config::PlacementAction;
use crate::tools::is_path_occupied;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// 單一檔案的放置結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PlacementStatus {
    /// 只計算目的地
    Planned,
    Moved,
    Copied,
    /// 重複檔案依設定略過
    SkippedDuplicate,
    Failed(String),
}

impl PlacementStatus {
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Moved | Self::Copied)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// 依動作放置檔案，失敗時回傳 `Failed` 而非中斷
pub fn place_file(source: &Path, destination: &Path, action: PlacementAction) -> PlacementStatus {
    let result = match action {
        PlacementAction::None => return PlacementStatus::Planned,
        PlacementAction::Move => move_file(source, destination).map(|()| PlacementStatus::Moved),
        PlacementAction::Copy => copy_file(source, destination).map(|()| PlacementStatus::Copied),
    };

    result.unwrap_or_else(|e| {
        warn!("放置檔案失敗 {}: {e:#}", source.display());
        PlacementStatus::Failed(format!("{e:#}"))
    })
}

fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if is_path_occupied(destination) {
        bail!("目的地已存在: {}", destination.display());
    }

    match fs::rename(source, destination) {
        Ok(()) => {
            debug!("移動檔案: {} -> {}", source.display(), destination.display());
            Ok(())
        }
        Err(e) => {
            // rename 失敗（可能是跨檔案系統），改用複製後刪除
            debug!("rename 失敗，改用複製: {e}");
            copy_and_delete(source, destination)
        }
    }
}

fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    if is_path_occupied(destination) {
        bail!("目的地已存在: {}", destination.display());
    }

    fs::copy(source, destination).with_context(|| {
        format!(
            "複製檔案失敗: {} -> {}",
            source.display(),
            destination.display()
        )
    })?;
    debug!("複製檔案: {} -> {}", source.display(), destination.display());
    Ok(())
}

fn copy_and_delete(source: &Path, destination: &Path) -> Result<()> {
    copy_file(source, destination)?;
    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preview_does_not_touch_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("clip.mp4");
        let destination = temp_dir.path().join("1080p W30 001.mp4");
        fs::write(&source, b"video").unwrap();

        let status = place_file(&source, &destination, PlacementAction::None);
        assert_eq!(status, PlacementStatus::Planned);
        assert!(source.exists());
        assert!(!destination.exists());
    }

    #[test]
    fn test_move_and_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("clip.mp4");
        let copied = temp_dir.path().join("copy.mp4");
        let moved = temp_dir.path().join("moved.mp4");
        fs::write(&source, b"video").unwrap();

        assert_eq!(
            place_file(&source, &copied, PlacementAction::Copy),
            PlacementStatus::Copied
        );
        assert!(source.exists());
        assert_eq!(fs::read(&copied).unwrap(), b"video");

        assert_eq!(
            place_file(&source, &moved, PlacementAction::Move),
            PlacementStatus::Moved
        );
        assert!(!source.exists());
        assert_eq!(fs::read(&moved).unwrap(), b"video");
    }

    #[test]
    fn test_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("clip.mp4");
        let destination = temp_dir.path().join("taken.mp4");
        fs::write(&source, b"new").unwrap();
        fs::write(&destination, b"old").unwrap();

        let status = place_file(&source, &destination, PlacementAction::Move);
        assert!(status.is_failed());
        assert_eq!(fs::read(&destination).unwrap(), b"old");
        assert!(source.exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let status = place_file(
            &temp_dir.path().join("missing.mp4"),
            &temp_dir.path().join("dest.mp4"),
            PlacementAction::Copy,
        );
        assert!(status.is_failed());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_destination_is_not_written_through() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("clip.mp4");
        let target = temp_dir.path().join("elsewhere.mp4");
        let link = temp_dir.path().join("dest.mp4");
        fs::write(&source, b"video").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(place_file(&source, &link, PlacementAction::Copy).is_failed());
        assert!(place_file(&source, &link, PlacementAction::Move).is_failed());
        assert!(!target.exists());
        assert!(source.exists());
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }
}
