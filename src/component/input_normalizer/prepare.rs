use super::root_normalizer::normalize_roots;
use super::tree_sanitizer::sanitize_inputs;
use crate::config::VideoExtensionTable;
use crate::tools::collect_video_files;
use log::info;
use std::path::PathBuf;

/// 整理後的輸入與找到的影片
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedInputs {
    pub roots: Vec<PathBuf>,
    pub videos: Vec<PathBuf>,
    pub files_renamed: usize,
    pub dirs_renamed: usize,
    pub status: String,
}

/// 整理根路徑 → （選擇性）清理檔名 → 收集影片
#[must_use]
pub fn prepare_inputs(
    inputs: &[PathBuf],
    extensions: &VideoExtensionTable,
    include_extended: bool,
    sanitize: bool,
) -> PreparedInputs {
    let roots = normalize_roots(inputs);
    if roots.is_empty() {
        return PreparedInputs {
            status: "No valid files or folders were provided.".to_string(),
            ..PreparedInputs::default()
        };
    }

    let (roots, files_renamed, dirs_renamed) = if sanitize {
        let summary = sanitize_inputs(&roots);
        (summary.roots, summary.files_renamed, summary.dirs_renamed)
    } else {
        (roots, 0, 0)
    };

    let videos = collect_video_files(&roots, extensions, include_extended);
    let status = format!(
        "Inputs: {} | Video files: {} | Files renamed: {files_renamed} | Folders renamed: {dirs_renamed}",
        roots.len(),
        videos.len()
    );
    info!("{status}");

    PreparedInputs {
        roots,
        videos,
        files_renamed,
        dirs_renamed,
        status,
    }
}
