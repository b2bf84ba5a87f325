use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub const MAX_RECENT_PATHS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoExtensionTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
    #[serde(rename = "EXTENDED_VIDEO_FILE", default)]
    pub extended_video_file: Vec<String>,
}

impl VideoExtensionTable {
    /// 副檔名集合（含前導點、小寫）
    #[must_use]
    pub fn extensions_set(&self, include_extended: bool) -> HashSet<String> {
        self.known_extensions(include_extended)
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    /// 以 `._` 開頭的檔案（macOS resource fork）一律排除
    #[must_use]
    pub fn is_video_file(&self, path: &Path, include_extended: bool) -> bool {
        let is_resource_fork = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("._"));
        if is_resource_fork {
            return false;
        }

        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.known_extensions(include_extended).any(|known| {
            known
                .strip_prefix('.')
                .is_some_and(|known| known.eq_ignore_ascii_case(extension))
        })
    }

    fn known_extensions(&self, include_extended: bool) -> impl Iterator<Item = &String> {
        let extended: &[String] = if include_extended {
            &self.extended_video_file
        } else {
            &[]
        };
        self.video_file.iter().chain(extended)
    }
}

/// 命名與資料夾結構模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// 依解析度分資料夾
    ByResolution,
    /// 依解析度 + 方向分資料夾
    ByResolutionOrientation,
    /// 依解析度 + 方向 + 幀率分資料夾
    #[default]
    ByResolutionOrientationFrameRate,
    /// 不分資料夾，檔名包含完整分類
    ProVidFlat,
    /// 依解析度分資料夾，保留原始檔名
    KeepOriginalName,
    /// 不分資料夾，檔名只有前綴與標記
    EmojiOnly,
}

impl SortMode {
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::ByResolution,
            Self::ByResolutionOrientation,
            Self::ByResolutionOrientationFrameRate,
            Self::ProVidFlat,
            Self::KeepOriginalName,
            Self::EmojiOnly,
        ]
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ByResolution => "Resolution",
            Self::ByResolutionOrientation => "Resolution + Orientation",
            Self::ByResolutionOrientationFrameRate => "Resolution + Orientation + FPS",
            Self::ProVidFlat => "Flat (ProVid)",
            Self::KeepOriginalName => "Keep original name",
            Self::EmojiOnly => "Emoji only",
        };
        f.write_str(name)
    }
}

/// 計算出目的地後對原始檔的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementAction {
    /// 只預覽，不動檔案
    #[default]
    None,
    Move,
    Copy,
}

impl fmt::Display for PlacementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "Preview only",
            Self::Move => "Move",
            Self::Copy => "Copy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnUs => "English",
            Self::ZhTw => "繁體中文",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerSettings {
    pub sort_mode: SortMode,
    pub prefix: String,
    pub placement: PlacementAction,
    /// 重複檔案只計算目的地，不搬移
    pub skip_duplicates: bool,
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::default(),
            prefix: String::new(),
            placement: PlacementAction::default(),
            skip_duplicates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub organizer: OrganizerSettings,
    /// 處理前先清理輸入檔名
    pub sanitize_inputs: bool,
    /// 額外包含 .flv / .mpg
    pub include_extended_extensions: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            recent_paths: Vec::new(),
            organizer: OrganizerSettings::default(),
            sanitize_inputs: true,
            include_extended_extensions: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub video_extensions: VideoExtensionTable,
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VideoExtensionTable {
        VideoExtensionTable {
            video_file: vec![".mp4".to_string(), ".MOV".to_string()],
            extended_video_file: vec![".flv".to_string()],
        }
    }

    #[test]
    fn test_is_video_file() {
        let table = table();
        assert!(table.is_video_file(Path::new("/a/clip.mp4"), false));
        assert!(table.is_video_file(Path::new("/a/clip.MP4"), false));
        assert!(table.is_video_file(Path::new("/a/clip.mov"), false));
        assert!(!table.is_video_file(Path::new("/a/notes.txt"), false));
        assert!(!table.is_video_file(Path::new("/a/noext"), false));
    }

    #[test]
    fn test_extension_must_match_whole() {
        let table = table();
        assert!(!table.is_video_file(Path::new("/a/clip.tmp4"), false));
        assert!(!table.is_video_file(Path::new("/a/clip.mp"), false));
        assert!(!table.is_video_file(Path::new("/a/mp4"), false));
        assert!(table.is_video_file(Path::new("/a/CLIP.Mov"), false));
    }

    #[test]
    fn test_resource_fork_excluded() {
        assert!(!table().is_video_file(Path::new("/a/._clip.mp4"), false));
    }

    #[test]
    fn test_extended_extensions() {
        let table = table();
        assert!(!table.is_video_file(Path::new("/a/old.flv"), false));
        assert!(table.is_video_file(Path::new("/a/old.flv"), true));
    }

    #[test]
    fn test_settings_roundtrip_with_missing_fields() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"organizer": {"sort_mode": "keep_original_name"}}"#).unwrap();
        assert_eq!(settings.organizer.sort_mode, SortMode::KeepOriginalName);
        assert!(settings.organizer.skip_duplicates);
        assert!(settings.sanitize_inputs);
        assert_eq!(settings.language, Language::EnUs);
    }
}
