//! 輸入整理元件
//!
//! 去除重複與巢狀的輸入路徑，並就地清理檔案與資料夾名稱

mod main;
mod prepare;
mod root_normalizer;
mod tree_sanitizer;

pub use main::InputNormalizer;
pub use prepare::{PreparedInputs, prepare_inputs};
pub use root_normalizer::normalize_roots;
pub use tree_sanitizer::{
    EntryKind, RenameOutcome, SanitizeSummary, TreeSanitizeResult, rename_to_sanitized,
    resolve_unique_target, sanitize_inputs, sanitize_tree, sanitized_name,
};
