//! 檔名清理
//!
//! 所有要寫入檔案系統的名稱都經過同一套規則

use regex::Regex;
use std::sync::LazyLock;

pub const MAX_FILENAME_CHARS: usize = 200;

/// 保留副檔名截斷時，副檔名長度上限（不含）
const MAX_PRESERVED_EXTENSION_CHARS: usize = 10;

static REGEX_FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).expect("Invalid regex"));

static REGEX_MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static REGEX_MULTIPLE_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("Invalid regex"));

static REGEX_UNDERSCORE_BEFORE_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+\.").expect("Invalid regex"));

/// 清理檔名
///
/// 1. `/ \ : * ? " < > |` 換成底線
/// 2. 連續空白合併為一個空格，連續底線合併為一個
/// 3. 移除副檔名點號前的底線
/// 4. 去除頭尾的空格與底線
/// 5. 超過 200 字元時截斷，副檔名短於 10 字元則保留副檔名
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    truncate_preserving_extension(&sanitize_name_part(name), MAX_FILENAME_CHARS)
}

/// 只做字元清理（規則 1 到 4），不截斷；用於之後還要接上流水號的名稱片段
#[must_use]
pub fn sanitize_name_part(name: &str) -> String {
    let result = REGEX_FORBIDDEN_CHARS.replace_all(name, "_");
    let result = REGEX_MULTIPLE_SPACES.replace_all(&result, " ");
    let result = REGEX_MULTIPLE_UNDERSCORES.replace_all(&result, "_");
    let result = REGEX_UNDERSCORE_BEFORE_DOT.replace_all(&result, ".");
    trim_separators(&result).to_string()
}

/// 截到最多 `max_chars` 個字元，並去除截斷後留在尾端的空格與底線
#[must_use]
pub fn truncate_name_part(part: &str, max_chars: usize) -> String {
    let truncated: String = part.chars().take(max_chars).collect();
    trim_separators(&truncated).to_string()
}

fn trim_separators(name: &str) -> &str {
    name.trim_matches(|c| c == ' ' || c == '_')
}

fn truncate_preserving_extension(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }

    if let Some((base, extension)) = name.rsplit_once('.') {
        let extension_chars = extension.chars().count();
        if extension_chars < MAX_PRESERVED_EXTENSION_CHARS {
            let keep = max_chars.saturating_sub(extension_chars + 1);
            let base: String = base.chars().take(keep).collect();
            return format!("{base}.{extension}");
        }
    }

    name.chars().take(max_chars).collect()
}
