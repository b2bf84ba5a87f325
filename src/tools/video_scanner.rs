use crate::config::VideoExtensionTable;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 掃描資料夾下的影片檔案，依路徑排序以確保每次順序一致
#[must_use]
pub fn scan_video_files(
    directory: &Path,
    extensions: &VideoExtensionTable,
    include_extended: bool,
) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| extensions.is_video_file(entry.path(), include_extended))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// 從多個輸入（檔案或資料夾）收集影片，保留輸入順序並去除重複
#[must_use]
pub fn collect_video_files(
    inputs: &[PathBuf],
    extensions: &VideoExtensionTable,
    include_extended: bool,
) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut videos = Vec::new();

    for input in inputs {
        let found = if input.is_file() {
            if extensions.is_video_file(input, include_extended) {
                vec![input.clone()]
            } else {
                Vec::new()
            }
        } else if input.is_dir() {
            scan_video_files(input, extensions, include_extended)
        } else {
            Vec::new()
        };

        for path in found {
            if seen.insert(path.clone()) {
                videos.push(path);
            }
        }
    }

    videos
}
