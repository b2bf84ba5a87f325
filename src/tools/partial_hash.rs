use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 只讀取檔案開頭的 1 MiB 計算 hash
pub const PARTIAL_HASH_WINDOW: u64 = 1024 * 1024;

/// 計算檔案開頭 1 MiB 的 BLAKE3 hash
///
/// 空檔案回傳 `None`（沒有指紋）
pub fn calculate_partial_hash(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).with_context(|| format!("無法開啟檔案: {}", path.display()))?;
    let mut window = Vec::with_capacity(PARTIAL_HASH_WINDOW as usize);
    file.take(PARTIAL_HASH_WINDOW)
        .read_to_end(&mut window)
        .with_context(|| format!("讀取檔案失敗: {}", path.display()))?;

    if window.is_empty() {
        return Ok(None);
    }

    Ok(Some(blake3::hash(&window).to_hex().to_string()))
}
