//! 就地清理檔案與資料夾名稱
//!
//! 由下往上處理（先子項目再父資料夾），最後才處理根目錄本身，
//! 目標名稱已存在時加上 `_N` 後綴

use crate::tools::{is_path_occupied, sanitize_filename};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 清理後為空字串時使用的名稱
const EMPTY_NAME_REPLACEMENT: &str = "untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// 單一項目的改名結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Unchanged,
    Renamed(PathBuf),
    /// 改名失敗，項目保留原名
    Failed { error: String },
}

impl RenameOutcome {
    /// 改名後的實際路徑
    #[must_use]
    pub fn resulting_path(&self, original: &Path) -> PathBuf {
        match self {
            Self::Renamed(path) => path.clone(),
            Self::Unchanged | Self::Failed { .. } => original.to_path_buf(),
        }
    }

    #[must_use]
    pub const fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSanitizeResult {
    /// 根目錄改名後的路徑
    pub root: PathBuf,
    pub files_renamed: usize,
    pub dirs_renamed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeSummary {
    pub roots: Vec<PathBuf>,
    /// 根路徑本身被改名的項目：（原路徑, 新路徑）
    pub renamed_roots: Vec<(PathBuf, PathBuf)>,
    pub files_renamed: usize,
    pub dirs_renamed: usize,
}

#[must_use]
pub fn sanitized_name(name: &str) -> String {
    let cleaned = sanitize_filename(name);
    if cleaned.is_empty() {
        EMPTY_NAME_REPLACEMENT.to_string()
    } else {
        cleaned
    }
}

/// 目標已存在時找下一個可用名稱
///
/// 檔案：`base_N.ext`；資料夾：`name_N`，N 從 1 開始
#[must_use]
pub fn resolve_unique_target(target: &Path, kind: EntryKind) -> PathBuf {
    if !is_path_occupied(target) {
        return target.to_path_buf();
    }

    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    let (base, extension) = match kind {
        EntryKind::File => {
            let stem = target
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "file".to_string());
            let extension = target
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            (stem, extension)
        }
        EntryKind::Directory => (
            target
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            String::new(),
        ),
    };

    let mut index = 1;
    loop {
        let candidate = parent.join(format!("{base}_{index}{extension}"));
        if !is_path_occupied(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

/// 將項目改為清理後的名稱
pub fn rename_to_sanitized(path: &Path, kind: EntryKind) -> RenameOutcome {
    let Some(name) = path.file_name() else {
        return RenameOutcome::Unchanged;
    };
    let name = name.to_string_lossy();
    let cleaned = sanitized_name(&name);
    if cleaned == name {
        return RenameOutcome::Unchanged;
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let target = resolve_unique_target(&parent.join(&cleaned), kind);

    match fs::rename(path, &target) {
        Ok(()) => {
            debug!("改名: {} -> {}", path.display(), target.display());
            RenameOutcome::Renamed(target)
        }
        Err(e) => {
            warn!("無法改名 {}: {e}", path.display());
            RenameOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// 清理整個資料夾樹
pub fn sanitize_tree(root: &Path) -> TreeSanitizeResult {
    // 先收集再改名，避免邊走訪邊修改目錄
    let entries: Vec<(PathBuf, EntryKind)> = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let kind = if entry.file_type().is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };
                Some((entry.into_path(), kind))
            }
            Err(e) => {
                warn!("無法讀取項目: {e}");
                None
            }
        })
        .collect();

    let mut files_renamed = 0;
    let mut dirs_renamed = 0;

    for (path, kind) in &entries {
        if rename_to_sanitized(path, *kind).is_renamed() {
            match kind {
                EntryKind::File => files_renamed += 1,
                EntryKind::Directory => dirs_renamed += 1,
            }
        }
    }

    let outcome = rename_to_sanitized(root, EntryKind::Directory);
    if outcome.is_renamed() {
        dirs_renamed += 1;
    }

    TreeSanitizeResult {
        root: outcome.resulting_path(root),
        files_renamed,
        dirs_renamed,
    }
}

/// 清理已整理過的根路徑：檔案直接改名，資料夾整棵處理
pub fn sanitize_inputs(roots: &[PathBuf]) -> SanitizeSummary {
    let mut summary = SanitizeSummary::default();

    for root in roots {
        let resulting = if root.is_file() {
            let outcome = rename_to_sanitized(root, EntryKind::File);
            summary.files_renamed += usize::from(outcome.is_renamed());
            outcome.resulting_path(root)
        } else if root.is_dir() {
            let result = sanitize_tree(root);
            summary.files_renamed += result.files_renamed;
            summary.dirs_renamed += result.dirs_renamed;
            result.root
        } else {
            warn!("略過不存在的路徑: {}", root.display());
            continue;
        };

        if resulting != *root {
            summary.renamed_roots.push((root.clone(), resulting.clone()));
        }
        summary.roots.push(resulting);
    }

    info!(
        "檔名清理完成 - 檔案: {}, 資料夾: {}",
        summary.files_renamed, summary.dirs_renamed
    );
    summary
}
