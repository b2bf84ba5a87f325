use super::video_metadata::{MetadataProbe, VideoMetadata};
use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    #[serde(default)]
    tags: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    #[serde(default)]
    tags: HashMap<String, Value>,
    #[serde(default)]
    side_data_list: Vec<SideData>,
}

#[derive(Deserialize)]
struct SideData {
    rotation: Option<Value>,
}

/// iPhone 型號對應表，較長的名稱需排在前面（例如 6s 在 6 之前）
const IPHONE_MODELS: &[(&str, &str)] = &[
    ("iphone 16", "16"),
    ("iphone 15", "15"),
    ("iphone 14", "14"),
    ("iphone 13", "13"),
    ("iphone 12", "12"),
    ("iphone 11", "11"),
    ("iphone xs", "XS"),
    ("iphone xr", "XR"),
    ("iphone x", "X"),
    ("iphone 8", "8"),
    ("iphone 7", "7"),
    ("iphone 6s", "6s"),
    ("iphone 6", "6"),
    ("iphone se", "SE"),
    ("iphone 5s", "5s"),
    ("iphone 5c", "5c"),
    ("iphone 5", "5"),
    ("iphone 4s", "4S"),
    ("iphone 4", "4"),
    ("iphone 3g", "3G"),
];

static REGEX_IPHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)iPhone\s*([0-9XRS]+)").expect("Invalid regex"));

const GPS_TAG_HINTS: &[&str] = &["location", "gps", "coordinates", "latitude"];
const CAMERA_TAG_HINTS: &[&str] = &["camera", "lens", "focal"];

/// 以 ffprobe 取得中繼資料
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("ffprobe"),
        }
    }

    /// 指定 ffprobe 執行檔位置
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl MetadataProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffprobe 執行失敗: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ffprobe_output(&stdout).with_context(|| format!("無法解析影片: {}", path.display()))
    }
}

/// 解析 ffprobe 的 JSON 輸出
pub fn parse_ffprobe_output(json: &str) -> Result<VideoMetadata> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| anyhow!("找不到視訊串流"))?;

    let width = video_stream.width.unwrap_or(0);
    let height = video_stream.height.unwrap_or(0);

    let fps = video_stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    let rotation = stream_rotation(video_stream);

    let format_tags = probe
        .format
        .as_ref()
        .map(|f| lowercase_tags(&f.tags))
        .unwrap_or_default();
    let stream_tags = lowercase_tags(&video_stream.tags);

    let device_model = extract_device_model(&format_tags, &stream_tags);
    let has_gps = has_tag_hint(&format_tags, &stream_tags, GPS_TAG_HINTS);
    let has_camera_lens = has_tag_hint(&format_tags, &stream_tags, CAMERA_TAG_HINTS);
    let is_edited = video_stream
        .avg_frame_rate
        .as_deref()
        .is_some_and(is_exact_edit_frame_rate);

    let mut metadata = VideoMetadata::new(width, height, rotation, fps)
        .with_gps(has_gps)
        .with_camera_lens(has_camera_lens)
        .with_edited(is_edited);
    if let Some(model) = device_model {
        metadata = metadata.with_device_model(model);
    }

    Ok(metadata)
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}

/// 剛好 30 或 60 fps 的平均幀率代表經過剪輯軟體重新輸出
fn is_exact_edit_frame_rate(rate: &str) -> bool {
    let Some((num_str, den_str)) = rate.split_once('/') else {
        return false;
    };
    let (Ok(num), Ok(den)) = (num_str.parse::<f64>(), den_str.parse::<f64>()) else {
        return false;
    };
    if den <= 0.0 {
        return false;
    }

    let exact = ((num / den) * 1_000_000.0).round() / 1_000_000.0;
    exact == 30.0 || exact == 60.0
}

/// 優先使用 `rotate` 標籤，其次 display matrix
fn stream_rotation(stream: &StreamInfo) -> i64 {
    if let Some(rotate) = stream.tags.get("rotate").and_then(value_as_f64) {
        return rotate.round() as i64;
    }

    stream
        .side_data_list
        .iter()
        .find_map(|side| side.rotation.as_ref().and_then(value_as_f64))
        .map_or(0, |r| r.round() as i64)
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lowercase_tags(tags: &HashMap<String, Value>) -> HashMap<String, String> {
    tags.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.to_lowercase(), value)
        })
        .collect()
}

fn tag_value<'a>(
    format_tags: &'a HashMap<String, String>,
    stream_tags: &'a HashMap<String, String>,
    keys: &[&str],
) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| format_tags.get(*key).or_else(|| stream_tags.get(*key)))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn has_tag_hint(
    format_tags: &HashMap<String, String>,
    stream_tags: &HashMap<String, String>,
    hints: &[&str],
) -> bool {
    format_tags
        .keys()
        .chain(stream_tags.keys())
        .any(|key| hints.iter().any(|hint| key.contains(hint)))
}

fn extract_device_model(
    format_tags: &HashMap<String, String>,
    stream_tags: &HashMap<String, String>,
) -> Option<String> {
    let make = tag_value(format_tags, stream_tags, &["make", "com.apple.quicktime.make"]);
    let model = tag_value(format_tags, stream_tags, &["model", "com.apple.quicktime.model"]);

    let full_model = match (make, model) {
        (Some(make), Some(model)) if model.to_lowercase().starts_with(&make.to_lowercase()) => {
            model.to_string()
        }
        (Some(make), Some(model)) => format!("{make} {model}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => return None,
    };

    Some(shorten_device_model(&full_model))
}

/// iPhone 型號縮寫成數字或代號，其他裝置保持原樣
fn shorten_device_model(full_model: &str) -> String {
    let lower = full_model.to_lowercase();
    if !lower.contains("iphone") {
        return full_model.to_string();
    }

    if let Some((_, short)) = IPHONE_MODELS.iter().find(|(key, _)| lower.contains(key)) {
        return (*short).to_string();
    }

    REGEX_IPHONE_NUMBER
        .captures(full_model)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| "iPhone".to_string(), |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_JSON: &str = r#"{
        "streams": [
            {"codec_type": "audio"},
            {
                "codec_type": "video",
                "width": 1920,
                "height": 1080,
                "r_frame_rate": "60000/1001",
                "avg_frame_rate": "59733/1000",
                "tags": {"rotate": "90"}
            }
        ],
        "format": {
            "tags": {
                "major_brand": "qt  ",
                "com.apple.quicktime.make": "Apple",
                "com.apple.quicktime.model": "iPhone 15 Pro",
                "com.apple.quicktime.location.ISO6709": "+37.3349-122.0090/",
                "com.apple.quicktime.camera.lens_model": "iPhone 15 Pro back camera"
            }
        }
    }"#;

    #[test]
    fn test_parse_iphone_output() {
        let metadata = parse_ffprobe_output(IPHONE_JSON).unwrap();
        assert_eq!(metadata.width, 1920);
        assert_eq!(metadata.height, 1080);
        assert_eq!(metadata.rotation, 90);
        assert!((metadata.fps - 59.94).abs() < 0.01);
        assert_eq!(metadata.device_model.as_deref(), Some("15"));
        assert!(metadata.has_gps);
        assert!(metadata.has_camera_lens);
        assert!(!metadata.is_edited);
    }

    #[test]
    fn test_parse_edited_output_with_display_matrix() {
        let json = r#"{
            "streams": [{
                "codec_type": "video",
                "width": 3840,
                "height": 2160,
                "r_frame_rate": "30/1",
                "avg_frame_rate": "30/1",
                "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]
            }],
            "format": {"tags": {"major_brand": "isom", "encoder": "Lavf60.3.100"}}
        }"#;

        let metadata = parse_ffprobe_output(json).unwrap();
        assert_eq!(metadata.rotation, 270);
        assert!(metadata.is_edited);
        assert!(metadata.device_model.is_none());
        assert!(!metadata.has_gps);
        assert!(!metadata.has_camera_lens);
    }

    #[test]
    fn test_parse_without_video_stream() {
        let json = r#"{"streams": [{"codec_type": "audio"}], "format": {}}"#;
        assert!(parse_ffprobe_output(json).is_err());
    }

    #[test]
    fn test_parse_malformed_output() {
        assert!(parse_ffprobe_output("not json").is_err());
    }

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("invalid").is_none());
        assert!(parse_frame_rate("30/0").is_none());
    }

    #[test]
    fn test_exact_edit_frame_rate() {
        assert!(is_exact_edit_frame_rate("30/1"));
        assert!(is_exact_edit_frame_rate("60/1"));
        assert!(is_exact_edit_frame_rate("120/4"));
        assert!(!is_exact_edit_frame_rate("30000/1001"));
        assert!(!is_exact_edit_frame_rate("0/0"));
        assert!(!is_exact_edit_frame_rate("30"));
    }

    #[test]
    fn test_shorten_device_model() {
        assert_eq!(shorten_device_model("Apple iPhone 6s Plus"), "6s");
        assert_eq!(shorten_device_model("iPhone XS Max"), "XS");
        assert_eq!(shorten_device_model("iPhone XR"), "XR");
        assert_eq!(shorten_device_model("iPhone 17"), "17");
        assert_eq!(shorten_device_model("iPhone"), "iPhone");
        assert_eq!(shorten_device_model("GoPro HERO11"), "GoPro HERO11");
    }

    #[test]
    fn test_device_model_from_make_and_model() {
        let mut format_tags = HashMap::new();
        format_tags.insert("make".to_string(), "DJI".to_string());
        format_tags.insert("model".to_string(), "Osmo Pocket".to_string());
        let stream_tags = HashMap::new();

        assert_eq!(
            extract_device_model(&format_tags, &stream_tags).as_deref(),
            Some("DJI Osmo Pocket")
        );
    }
}
