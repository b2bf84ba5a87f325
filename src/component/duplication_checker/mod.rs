//! 重複影片檢查元件
//!
//! 以檔案大小與開頭內容的 BLAKE3 hash 找出重複檔案，可選擇移到 duplication_file 資料夾

mod duplicate_scanner;
mod main;

pub use duplicate_scanner::{
    DUPLICATION_DIR_NAME, DuplicateMoveResult, DuplicatePair, DuplicateScanResult,
    find_duplicates, is_in_duplication_folder, move_duplicates,
};
pub use main::DuplicationChecker;
