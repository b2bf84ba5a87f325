//! 目的地命名模組
//!
//! 依分類結果與命名模式計算不衝突的目的地路徑，並維護各分類的流水號

use crate::config::SortMode;
use crate::tools::{
    Classification, MAX_FILENAME_CHARS, VideoMetadata, classify, ensure_directory_exists,
    is_path_occupied, sanitize_name_part, truncate_name_part,
};
use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSION: &str = "mov";

/// 一次整理工作的命名器，流水號只屬於這個實例
#[derive(Debug, Clone)]
pub struct Organizer {
    mode: SortMode,
    prefix: String,
    base_dir: PathBuf,
    /// 分類鍵 -> 最後使用的流水號
    counters: HashMap<String, u32>,
}

impl Organizer {
    pub fn new(mode: SortMode, prefix: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            prefix: prefix.into().trim().to_string(),
            base_dir: base_dir.into(),
            counters: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> SortMode {
        self.mode
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 分類鍵目前記錄的流水號
    #[must_use]
    pub fn counter(&self, category_key: &str) -> Option<u32> {
        self.counters.get(category_key).copied()
    }

    /// 計算目的地路徑
    ///
    /// 需要時建立子資料夾；目的地已存在於磁碟上時自動往下一個流水號找，
    /// 成功後才記錄流水號
    pub fn get_destination(&mut self, source: &Path, metadata: &VideoMetadata) -> Result<PathBuf> {
        let classification = classify(metadata);
        self.get_destination_for(source, &classification, &indicators(metadata))
    }

    /// 以已知分類計算目的地（探測失敗使用後備分類時，沒有標記）
    pub fn get_destination_for(
        &mut self,
        source: &Path,
        classification: &Classification,
        indicators: &str,
    ) -> Result<PathBuf> {
        let subfolder = self.subfolder(classification);
        let dest_dir = if subfolder.as_os_str().is_empty() {
            self.base_dir.clone()
        } else {
            self.base_dir.join(subfolder)
        };
        ensure_directory_exists(&dest_dir)?;

        let extension = normalize_extension(source);
        let category_key = classification.category_key();
        let mut counter = self.counters.get(&category_key).copied().unwrap_or(0) + 1;

        loop {
            let name =
                self.compose_filename(source, classification, indicators, counter, &extension);
            let dest_path = dest_dir.join(&name);

            if !is_path_occupied(&dest_path) {
                self.counters.insert(category_key, counter);
                debug!("分配目的地: {} -> {}", source.display(), dest_path.display());
                return Ok(dest_path);
            }

            debug!("目的地已存在，跳過: {}", dest_path.display());
            counter += 1;
        }
    }

    /// 依模式決定的子資料夾（相對於 `base_dir`）
    #[must_use]
    pub fn subfolder(&self, classification: &Classification) -> PathBuf {
        let tier = classification.resolution_tier.label();
        let orientation = classification.orientation.label();
        let fps = classification.frame_rate_bucket.value();

        match self.mode {
            SortMode::ByResolution | SortMode::KeepOriginalName => PathBuf::from(tier),
            SortMode::ByResolutionOrientation => {
                PathBuf::from(tier).join(format!("{tier} {orientation}"))
            }
            SortMode::ByResolutionOrientationFrameRate => {
                PathBuf::from(tier).join(format!("{tier} {orientation} {fps}"))
            }
            SortMode::ProVidFlat | SortMode::EmojiOnly => PathBuf::new(),
        }
    }

    /// 組合檔名；超過長度上限時只截短前段，流水號與副檔名一定保留
    fn compose_filename(
        &self,
        source: &Path,
        classification: &Classification,
        indicators: &str,
        counter: u32,
        extension: &str,
    ) -> String {
        let (head, separator) = if self.mode == SortMode::KeepOriginalName {
            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (sanitize_name_part(&stem), '_')
        } else {
            let mut parts: Vec<String> = Vec::with_capacity(3);
            if !self.prefix.is_empty() {
                parts.push(sanitize_name_part(&self.prefix));
            }
            if self.mode != SortMode::EmojiOnly {
                parts.push(format!(
                    "{} {}{}",
                    classification.resolution_tier.label(),
                    classification.orientation.code(),
                    classification.frame_rate_bucket.value()
                ));
            }
            if !indicators.is_empty() {
                parts.push(indicators.to_string());
            }
            parts.retain(|part| !part.is_empty());
            (parts.join(" "), ' ')
        };

        let tail = format!("{counter:03}.{extension}");
        let budget = MAX_FILENAME_CHARS.saturating_sub(tail.chars().count() + 1);
        let head = truncate_name_part(&head, budget);

        if head.is_empty() {
            tail
        } else {
            format!("{head}{separator}{tail}")
        }
    }
}

/// 標記字串，順序固定：裝置 📱、鏡頭 📷、GPS 🌍、剪輯 ✂️
#[must_use]
pub fn indicators(metadata: &VideoMetadata) -> String {
    let mut result = String::new();
    if metadata.device_model.is_some() {
        result.push('📱');
    }
    if metadata.has_camera_lens {
        result.push('📷');
    }
    if metadata.has_gps {
        result.push('🌍');
    }
    if metadata.is_edited {
        result.push_str("✂\u{fe0f}");
    }
    result
}

/// 副檔名轉小寫並只保留英數字，空白時預設為 mov
#[must_use]
pub fn normalize_extension(source: &Path) -> String {
    let extension: String = source
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    if extension.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        extension
    }
}
