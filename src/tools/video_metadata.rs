//! 影片中繼資料模型
//!
//! 由探測工具（ffprobe 等）取得的單一影片屬性，建立後不再變動

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 單一影片的探測結果
///
/// `width` / `height` 為旋轉校正前的原始值，校正只在分類時進行一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// 0、90、180 或 270
    pub rotation: u32,
    pub fps: f64,
    /// 裝置型號（例如 iPhone 的 "15"）
    pub device_model: Option<String>,
    pub has_gps: bool,
    pub has_camera_lens: bool,
    pub is_edited: bool,
}

impl VideoMetadata {
    /// 只有尺寸與幀率的中繼資料，其餘旗標皆為空
    #[must_use]
    pub fn new(width: u32, height: u32, rotation: i64, fps: f64) -> Self {
        Self {
            width,
            height,
            rotation: normalize_rotation(rotation),
            fps: if fps.is_finite() && fps > 0.0 { fps } else { 0.0 },
            device_model: None,
            has_gps: false,
            has_camera_lens: false,
            is_edited: false,
        }
    }

    #[must_use]
    pub fn with_device_model(mut self, model: impl Into<String>) -> Self {
        self.device_model = Some(model.into());
        self
    }

    #[must_use]
    pub const fn with_gps(mut self, has_gps: bool) -> Self {
        self.has_gps = has_gps;
        self
    }

    #[must_use]
    pub const fn with_camera_lens(mut self, has_camera_lens: bool) -> Self {
        self.has_camera_lens = has_camera_lens;
        self
    }

    #[must_use]
    pub const fn with_edited(mut self, is_edited: bool) -> Self {
        self.is_edited = is_edited;
        self
    }
}

/// 將任意角度（含負值，如 -90）轉成 0..360，非 90 倍數的角度視為 0
#[must_use]
pub fn normalize_rotation(rotation: i64) -> u32 {
    let normalized = rotation.rem_euclid(360);
    match normalized {
        90 | 180 | 270 => normalized as u32,
        _ => 0,
    }
}

/// 中繼資料探測介面
///
/// 失敗（工具不存在、沒有視訊串流、輸出無法解析）一律以 `Err` 回報，
/// 由呼叫端決定後備分類
pub trait MetadataProbe {
    fn probe(&self, path: &Path) -> Result<VideoMetadata>;
}

impl<P: MetadataProbe + ?Sized> MetadataProbe for &P {
    fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        (**self).probe(path)
    }
}

impl<P: MetadataProbe + ?Sized> MetadataProbe for Box<P> {
    fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        (**self).probe(path)
    }
}
