//! 批次處理流程
//!
//! 依輸入順序逐一處理影片：指紋檢查 → 探測 → 分類 → 目的地 → 放置。
//! 單一檔案的錯誤轉成該檔案結果上的標記，不會中斷整批

use super::organizer::{Organizer, indicators};
use super::placement::{PlacementStatus, place_file};
use crate::config::PlacementAction;
use crate::tools::{
    Classification, DuplicateCheck, FingerprintIndex, FrameRateBucket, MetadataProbe,
    Orientation, ResolutionTier, VideoMetadata, classify, ensure_directory_exists,
};
use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    pub placement: PlacementAction,
    /// 放置時略過重複檔案
    pub skip_duplicates: bool,
}

/// 每處理完一個檔案送出的進度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
    pub current: PathBuf,
}

/// 單一檔案的處理結果
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub file_name: String,
    pub classification: Classification,
    /// 探測失敗時為 `None`
    pub metadata: Option<VideoMetadata>,
    pub probe_error: Option<String>,
    pub is_duplicate: bool,
    pub duplicate_of: Option<PathBuf>,
    /// 無法分配目的地時為空路徑，原因記在 `destination_error`
    pub destination: PathBuf,
    pub destination_error: Option<String>,
    pub placement: PlacementStatus,
}

impl FileResult {
    #[must_use]
    pub fn report_row(&self) -> ReportRow {
        let metadata = self.metadata.as_ref();
        ReportRow {
            filename: self.file_name.clone(),
            resolution: self.classification.resolution_tier,
            orientation: self.classification.orientation,
            frame_rate: self.classification.frame_rate_bucket,
            device_model: metadata.and_then(|m| m.device_model.clone()),
            has_gps: metadata.is_some_and(|m| m.has_gps),
            has_camera_lens: metadata.is_some_and(|m| m.has_camera_lens),
            is_duplicate: self.is_duplicate,
            path: self.path.clone(),
        }
    }
}

/// 報表用的扁平紀錄，由呼叫端自行輸出成 CSV / JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub filename: String,
    pub resolution: ResolutionTier,
    pub orientation: Orientation,
    pub frame_rate: FrameRateBucket,
    pub device_model: Option<String>,
    pub has_gps: bool,
    pub has_camera_lens: bool,
    pub is_duplicate: bool,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub duplicates: usize,
    pub probe_failures: usize,
    pub placed: usize,
    pub placement_failures: usize,
    pub with_device: usize,
    pub with_gps: usize,
    pub with_camera_lens: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: Vec<FileResult>,
    pub cancelled: bool,
    pub status: String,
}

impl BatchOutcome {
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.results.len(),
            ..BatchSummary::default()
        };

        for result in &self.results {
            summary.duplicates += usize::from(result.is_duplicate);
            summary.probe_failures += usize::from(result.probe_error.is_some());
            summary.placed += usize::from(result.placement.is_placed());
            summary.placement_failures += usize::from(result.placement.is_failed());
            if let Some(metadata) = &result.metadata {
                summary.with_device += usize::from(metadata.device_model.is_some());
                summary.with_gps += usize::from(metadata.has_gps);
                summary.with_camera_lens += usize::from(metadata.has_camera_lens);
            }
        }

        summary
    }

    #[must_use]
    pub fn report_rows(&self) -> Vec<ReportRow> {
        self.results.iter().map(FileResult::report_row).collect()
    }
}

/// 一次批次處理；指紋索引與命名器都只屬於這個實例
pub struct BatchPipeline<P: MetadataProbe> {
    probe: P,
    index: FingerprintIndex,
    organizer: Organizer,
    options: PipelineOptions,
    shutdown_signal: Arc<AtomicBool>,
}

impl<P: MetadataProbe> BatchPipeline<P> {
    pub fn new(
        probe: P,
        organizer: Organizer,
        options: PipelineOptions,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            probe,
            index: FingerprintIndex::new(),
            organizer,
            options,
            shutdown_signal,
        }
    }

    #[must_use]
    pub const fn organizer(&self) -> &Organizer {
        &self.organizer
    }

    #[must_use]
    pub const fn index(&self) -> &FingerprintIndex {
        &self.index
    }

    #[must_use]
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_signal)
    }

    /// 依序處理檔案，每個檔案完成後呼叫 `on_file`
    ///
    /// 中斷訊號只在檔案之間檢查；只有無法建立基底資料夾這類結構性錯誤會回傳 `Err`，
    /// 單一分類的子資料夾失敗只標記在該檔案上
    pub fn run<F>(&mut self, files: &[PathBuf], mut on_file: F) -> Result<BatchOutcome>
    where
        F: FnMut(&BatchProgress, &FileResult),
    {
        let total = files.len();
        if total == 0 {
            return Ok(BatchOutcome {
                results: Vec::new(),
                cancelled: false,
                status: "No video files to process.".to_string(),
            });
        }

        ensure_directory_exists(self.organizer.base_dir())?;
        info!(
            "開始批次處理 {total} 個檔案，目的地: {}",
            self.organizer.base_dir().display()
        );

        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for path in files {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                cancelled = true;
                break;
            }

            let result = self.process_file(path);
            on_file(
                &BatchProgress {
                    processed: results.len() + 1,
                    total,
                    current: path.clone(),
                },
                &result,
            );
            results.push(result);
        }

        let status = if cancelled {
            format!("Stopped after {} of {total} files.", results.len())
        } else {
            format!("{} videos analyzed.", results.len())
        };
        info!("批次處理結束: {status}");

        Ok(BatchOutcome {
            results,
            cancelled,
            status,
        })
    }

    fn process_file(&mut self, path: &Path) -> FileResult {
        let duplicate_of = match self.index.check(path) {
            DuplicateCheck::Duplicate { original } => Some(original),
            DuplicateCheck::New | DuplicateCheck::Unfingerprintable => None,
        };

        let (metadata, probe_error) = match self.probe.probe(path) {
            Ok(metadata) => (Some(metadata), None),
            Err(e) => {
                warn!("探測失敗，使用後備分類 {}: {e:#}", path.display());
                (None, Some(format!("{e:#}")))
            }
        };

        let (classification, marks) = metadata.as_ref().map_or_else(
            || (Classification::fallback(), String::new()),
            |m| (classify(m), indicators(m)),
        );

        let is_duplicate = duplicate_of.is_some();
        let (destination, destination_error, placement) = match self
            .organizer
            .get_destination_for(path, &classification, &marks)
        {
            Ok(destination) => {
                let placement = if is_duplicate
                    && self.options.skip_duplicates
                    && self.options.placement != PlacementAction::None
                {
                    PlacementStatus::SkippedDuplicate
                } else {
                    place_file(path, &destination, self.options.placement)
                };
                debug!(
                    "{} -> {} ({})",
                    path.display(),
                    destination.display(),
                    classification.category_key()
                );
                (destination, None, placement)
            }
            Err(e) => {
                warn!("無法分配目的地 {}: {e:#}", path.display());
                let message = format!("{e:#}");
                (
                    PathBuf::new(),
                    Some(message.clone()),
                    PlacementStatus::Failed(message),
                )
            }
        };

        FileResult {
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            classification,
            metadata,
            probe_error,
            is_duplicate,
            duplicate_of,
            destination,
            destination_error,
            placement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortMode;
    use anyhow::bail;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// 依檔名回傳預先設定的中繼資料
    struct FakeProbe {
        by_name: HashMap<String, VideoMetadata>,
    }

    impl FakeProbe {
        fn new(entries: &[(&str, VideoMetadata)]) -> Self {
            Self {
                by_name: entries
                    .iter()
                    .map(|(name, m)| ((*name).to_string(), m.clone()))
                    .collect(),
            }
        }
    }

    impl MetadataProbe for FakeProbe {
        fn probe(&self, path: &Path) -> Result<VideoMetadata> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            match self.by_name.get(&name) {
                Some(metadata) => Ok(metadata.clone()),
                None => bail!("找不到視訊串流"),
            }
        }
    }

    fn pipeline(
        probe: FakeProbe,
        base: &Path,
        mode: SortMode,
        options: PipelineOptions,
    ) -> BatchPipeline<FakeProbe> {
        BatchPipeline::new(
            probe,
            Organizer::new(mode, "", base),
            options,
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn test_empty_input_is_zero_work() {
        let temp_dir = TempDir::new().unwrap();
        let mut pipeline = pipeline(
            FakeProbe::new(&[]),
            &temp_dir.path().join("out"),
            SortMode::ProVidFlat,
            PipelineOptions::default(),
        );

        let outcome = pipeline.run(&[], |_, _| {}).unwrap();
        assert!(outcome.results.is_empty());
        assert!(!outcome.cancelled);
        assert_eq!(outcome.status, "No video files to process.");
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_probe_failure_uses_fallback_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        let broken = input.join("broken.mp4");
        let good = input.join("good.mp4");
        fs::write(&broken, b"broken").unwrap();
        fs::write(&good, b"good").unwrap();

        let probe = FakeProbe::new(&[("good.mp4", VideoMetadata::new(3840, 2160, 0, 60.0))]);
        let out = temp_dir.path().join("out");
        let mut pipeline = pipeline(
            probe,
            &out,
            SortMode::ByResolution,
            PipelineOptions::default(),
        );

        let mut progress = Vec::new();
        let outcome = pipeline
            .run(&[broken.clone(), good.clone()], |p, _| progress.push(p.clone()))
            .unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].path, broken);
        assert_eq!(outcome.results[0].classification, Classification::fallback());
        assert!(outcome.results[0].probe_error.is_some());
        assert_eq!(outcome.results[0].destination, out.join("SD").join("SD W30 001.mp4"));
        assert_eq!(outcome.results[1].path, good);
        assert_eq!(
            outcome.results[1].destination,
            out.join("4K").join("4K W60 001.mp4")
        );
        assert_eq!(
            progress,
            vec![
                BatchProgress {
                    processed: 1,
                    total: 2,
                    current: broken.clone(),
                },
                BatchProgress {
                    processed: 2,
                    total: 2,
                    current: good.clone(),
                },
            ]
        );
        assert_eq!(outcome.summary().probe_failures, 1);
    }

    #[test]
    fn test_cancellation_between_files() {
        let temp_dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = temp_dir.path().join(format!("clip{i}.mp4"));
                fs::write(&path, format!("clip {i}")).unwrap();
                path
            })
            .collect();

        let shutdown_signal = Arc::new(AtomicBool::new(false));
        let mut pipeline = BatchPipeline::new(
            FakeProbe::new(&[]),
            Organizer::new(SortMode::ProVidFlat, "", temp_dir.path().join("out")),
            PipelineOptions::default(),
            Arc::clone(&shutdown_signal),
        );

        let outcome = pipeline
            .run(&files, |progress, _| {
                if progress.processed == 1 {
                    shutdown_signal.store(true, Ordering::SeqCst);
                }
            })
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.status, "Stopped after 1 of 3 files.");
    }

    #[test]
    fn test_move_skips_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.mp4");
        let second = temp_dir.path().join("b.mp4");
        fs::write(&first, b"same").unwrap();
        fs::write(&second, b"same").unwrap();

        let metadata = VideoMetadata::new(1280, 720, 0, 30.0).with_gps(true);
        let probe = FakeProbe::new(&[("a.mp4", metadata.clone()), ("b.mp4", metadata)]);
        let out = temp_dir.path().join("out");
        let mut pipeline = pipeline(
            probe,
            &out,
            SortMode::ProVidFlat,
            PipelineOptions {
                placement: PlacementAction::Move,
                skip_duplicates: true,
            },
        );

        let outcome = pipeline.run(&[first.clone(), second.clone()], |_, _| {}).unwrap();

        assert_eq!(outcome.results[0].placement, PlacementStatus::Moved);
        assert!(outcome.results[0].destination.exists());
        assert!(!first.exists());
        assert_eq!(outcome.results[1].placement, PlacementStatus::SkippedDuplicate);
        assert_eq!(outcome.results[1].duplicate_of.as_deref(), Some(first.as_path()));
        assert!(second.exists());

        let summary = outcome.summary();
        assert_eq!(summary.placed, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.with_gps, 2);
    }

    #[test]
    fn test_report_rows() {
        let temp_dir = TempDir::new().unwrap();
        let clip = temp_dir.path().join("clip.mov");
        fs::write(&clip, b"clip").unwrap();

        let metadata = VideoMetadata::new(1080, 1920, 0, 30.0)
            .with_device_model("15")
            .with_camera_lens(true);
        let mut pipeline = pipeline(
            FakeProbe::new(&[("clip.mov", metadata)]),
            &temp_dir.path().join("out"),
            SortMode::EmojiOnly,
            PipelineOptions::default(),
        );

        let outcome = pipeline.run(&[clip.clone()], |_, _| {}).unwrap();
        let rows = outcome.report_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "clip.mov");
        assert_eq!(rows[0].resolution, ResolutionTier::FullHd);
        assert_eq!(rows[0].orientation, Orientation::Vertical);
        assert_eq!(rows[0].device_model.as_deref(), Some("15"));
        assert!(rows[0].has_camera_lens);
        assert!(!rows[0].is_duplicate);
        assert_eq!(rows[0].path, clip);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["resolution"], "1080p");
        assert_eq!(json["frame_rate"], "30");
    }

    #[test]
    fn test_blocked_category_folder_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("1080p"), b"not a folder").unwrap();

        let hd = temp_dir.path().join("hd.mp4");
        let sd = temp_dir.path().join("sd.mp4");
        fs::write(&hd, b"hd").unwrap();
        fs::write(&sd, b"sd").unwrap();

        let probe = FakeProbe::new(&[
            ("hd.mp4", VideoMetadata::new(1920, 1080, 0, 30.0)),
            ("sd.mp4", VideoMetadata::new(640, 480, 0, 30.0)),
        ]);
        let mut pipeline = pipeline(
            probe,
            &out,
            SortMode::ByResolution,
            PipelineOptions {
                placement: PlacementAction::Copy,
                skip_duplicates: true,
            },
        );

        let outcome = pipeline.run(&[hd.clone(), sd.clone()], |_, _| {}).unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results[0].destination_error.is_some());
        assert!(outcome.results[0].placement.is_failed());
        assert_eq!(outcome.results[0].destination, PathBuf::new());
        assert!(hd.exists());

        assert!(outcome.results[1].destination_error.is_none());
        assert_eq!(outcome.results[1].placement, PlacementStatus::Copied);
        assert_eq!(outcome.results[1].destination, out.join("SD").join("SD W30 001.mp4"));

        let summary = outcome.summary();
        assert_eq!(summary.placement_failures, 1);
        assert_eq!(summary.placed, 1);
        assert_eq!(outcome.status, "2 videos analyzed.");
    }
}
