//! 影片分類
//!
//! 將中繼資料對應到解析度等級、方向與幀率區間，純函式、無副作用

use super::video_metadata::VideoMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[serde(rename = "4K")]
    Uhd4K,
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "SD")]
    Sd,
}

impl ResolutionTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uhd4K => "4K",
            Self::FullHd => "1080p",
            Self::Hd720 => "720p",
            Self::Hd => "HD",
            Self::Sd => "SD",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Wide,
    Vertical,
}

impl Orientation {
    /// 檔名中使用的單字母代碼
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Wide => "W",
            Self::Vertical => "V",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wide => "Wide",
            Self::Vertical => "Vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameRateBucket {
    #[serde(rename = "30")]
    Fps30,
    #[serde(rename = "60")]
    Fps60,
}

impl FrameRateBucket {
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Fps30 => 30,
            Self::Fps60 => 60,
        }
    }
}

impl fmt::Display for FrameRateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// 分類結果，每次由中繼資料重新計算，不快取
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub resolution_tier: ResolutionTier,
    pub orientation: Orientation,
    pub frame_rate_bucket: FrameRateBucket,
}

impl Classification {
    /// 探測失敗時使用的後備分類：SD / Wide / 30
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            resolution_tier: ResolutionTier::Sd,
            orientation: Orientation::Wide,
            frame_rate_bucket: FrameRateBucket::Fps30,
        }
    }

    /// 計數器分區用的鍵，固定為三段 `tier|orientation|fps`
    #[must_use]
    pub fn category_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.resolution_tier.label(),
            self.orientation.code(),
            self.frame_rate_bucket.value()
        )
    }
}

#[must_use]
pub fn classify(metadata: &VideoMetadata) -> Classification {
    let (width, height) =
        apply_rotation_correction(metadata.width, metadata.height, metadata.rotation);

    Classification {
        resolution_tier: classify_resolution(width, height),
        orientation: classify_orientation(width, height),
        frame_rate_bucket: classify_frame_rate(metadata.fps),
    }
}

/// 依序檢查，先符合者優先；4000x1 這類極端比例仍歸為 4K
#[must_use]
pub const fn classify_resolution(width: u32, height: u32) -> ResolutionTier {
    if width >= 3840 || height >= 3840 || width >= 2160 || height >= 2160 {
        ResolutionTier::Uhd4K
    } else if width == 1920 || height == 1920 || width == 1080 || height == 1080 {
        ResolutionTier::FullHd
    } else if width == 1280 || height == 1280 || width == 720 || height == 720 {
        ResolutionTier::Hd720
    } else if width > 1080 || height > 1080 {
        ResolutionTier::Hd
    } else {
        ResolutionTier::Sd
    }
}

/// 寬高需已經過旋轉校正；正方形視為 Wide
#[must_use]
pub const fn classify_orientation(width: u32, height: u32) -> Orientation {
    if height > width {
        Orientation::Vertical
    } else {
        Orientation::Wide
    }
}

/// 45 fps 本身歸為 30
#[must_use]
pub fn classify_frame_rate(fps: f64) -> FrameRateBucket {
    if fps > 45.0 {
        FrameRateBucket::Fps60
    } else {
        FrameRateBucket::Fps30
    }
}

#[must_use]
pub const fn apply_rotation_correction(width: u32, height: u32, rotation: u32) -> (u32, u32) {
    match rotation {
        90 | 270 => (height, width),
        _ => (width, height),
    }
}
