use super::partial_hash::calculate_partial_hash;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 內容指紋：檔案大小 + 開頭 1 MiB 的 hash
///
/// 用來快速判斷意外的重複檔案，並非嚴格的內容比對
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FingerprintKey {
    pub size: u64,
    pub partial_hash: String,
}

/// 單次檢查的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// 第一次看到，已登記
    New,
    /// 與先前登記的檔案相同
    Duplicate { original: PathBuf },
    /// 空檔案或無法讀取，不登記也不視為重複
    Unfingerprintable,
}

impl DuplicateCheck {
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// 指紋索引：Key 是指紋，Value 是第一個出現的檔案路徑
///
/// 只增不減，先登記者為原始檔。不支援多執行緒同時寫入，
/// 一次掃描獨佔一個索引
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    entries: HashMap<FingerprintKey, PathBuf>,
}

impl FingerprintIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 計算檔案指紋，空檔案回傳 `None`
    pub fn fingerprint(path: &Path) -> Result<Option<FingerprintKey>> {
        let metadata =
            fs::metadata(path).with_context(|| format!("無法讀取檔案資訊: {}", path.display()))?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(calculate_partial_hash(path)?.map(|partial_hash| FingerprintKey {
            size: metadata.len(),
            partial_hash,
        }))
    }

    /// 檢查並登記檔案
    pub fn check(&mut self, path: &Path) -> DuplicateCheck {
        let key = match Self::fingerprint(path) {
            Ok(Some(key)) => key,
            Ok(None) => {
                debug!("檔案沒有指紋，略過: {}", path.display());
                return DuplicateCheck::Unfingerprintable;
            }
            Err(e) => {
                warn!("無法計算指紋 {}: {e:#}", path.display());
                return DuplicateCheck::Unfingerprintable;
            }
        };

        if let Some(original) = self.entries.get(&key) {
            return DuplicateCheck::Duplicate {
                original: original.clone(),
            };
        }

        self.entries.insert(key, path.to_path_buf());
        DuplicateCheck::New
    }

    /// 是否為先前檢查過的檔案的重複
    pub fn is_duplicate(&mut self, path: &Path) -> bool {
        self.check(path).is_duplicate()
    }

    /// 取得原始檔路徑；沒有對應紀錄時回傳輸入路徑本身
    #[must_use]
    pub fn get_original(&self, path: &Path) -> PathBuf {
        match Self::fingerprint(path) {
            Ok(Some(key)) => self
                .entries
                .get(&key)
                .cloned()
                .unwrap_or_else(|| path.to_path_buf()),
            _ => path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
