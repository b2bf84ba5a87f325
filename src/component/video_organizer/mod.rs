//! 影片分類整理元件
//!
//! 依解析度、方向、幀率分類影片，偵測重複內容，並產生不衝突的目的地名稱

mod batch_pipeline;
mod batch_worker;
mod main;
mod organizer;
mod placement;
mod report_filter;

pub use batch_pipeline::{
    BatchOutcome, BatchPipeline, BatchProgress, BatchSummary, FileResult, PipelineOptions,
    ReportRow,
};
pub use batch_worker::{BatchEvent, BatchWorker};
pub use main::VideoOrganizer;
pub use organizer::{Organizer, indicators, normalize_extension};
pub use placement::{PlacementStatus, place_file};
pub use report_filter::ReportFilter;
