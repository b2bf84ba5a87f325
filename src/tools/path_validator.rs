use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 路徑上是否已有任何項目；不跟隨符號連結，懸空的連結也算佔用
#[must_use]
pub fn is_path_occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// 建立資料夾（已存在時不做事）
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).with_context(|| format!("無法建立目錄: {}", path.display()))
}
