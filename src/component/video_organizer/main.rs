//! 影片整理主模組
//!
//! 協調輸入整理、背景分析與放置的整體流程

use super::batch_pipeline::{BatchOutcome, BatchPipeline, PipelineOptions};
use super::batch_worker::{BatchEvent, BatchWorker};
use super::organizer::Organizer;
use super::report_filter::ReportFilter;
use crate::component::input_normalizer::prepare_inputs;
use crate::component::path_prompt::prompt_input_paths;
use crate::config::{Config, PlacementAction};
use crate::tools::FfprobeProbe;
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 預設輸出資料夾名稱
const DEFAULT_OUTPUT_DIR: &str = "Organized";

/// 預覽時最多列出的檔案數
const PREVIEW_LIMIT: usize = 20;

pub struct VideoOrganizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoOrganizer {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 影片分類整理 ===").cyan().bold());

        let inputs = prompt_input_paths(&mut self.config, "請輸入影片檔案或資料夾路徑")?;

        println!("{}", style("整理輸入與掃描影片中...").dim());
        let prepared = prepare_inputs(
            &inputs,
            &self.config.video_extensions,
            self.config.settings.include_extended_extensions,
            self.config.settings.sanitize_inputs,
        );
        println!("{}", style(&prepared.status).dim());

        if prepared.videos.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(());
        }

        println!(
            "{}",
            style(format!("找到 {} 個影片檔案", prepared.videos.len())).green()
        );

        let output_dir = self.prompt_output_dir(&prepared.roots)?;
        self.display_settings(&output_dir);

        if !self.confirm_start()? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        let organizer_settings = &self.config.settings.organizer;
        let pipeline = BatchPipeline::new(
            FfprobeProbe::new(),
            Organizer::new(
                organizer_settings.sort_mode,
                organizer_settings.prefix.as_str(),
                &output_dir,
            ),
            PipelineOptions {
                placement: organizer_settings.placement,
                skip_duplicates: organizer_settings.skip_duplicates,
            },
            Arc::clone(&self.shutdown_signal),
        );

        let outcome = Self::run_worker(pipeline, prepared.videos)?;
        self.display_results(&outcome);

        Ok(())
    }

    fn prompt_output_dir(&self, roots: &[PathBuf]) -> Result<PathBuf> {
        let default = roots
            .first()
            .map(|root| {
                let base = if root.is_dir() {
                    root.as_path()
                } else {
                    root.parent().unwrap_or(root.as_path())
                };
                base.join(DEFAULT_OUTPUT_DIR)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let path: String = Input::new()
            .with_prompt("請輸入輸出資料夾")
            .default(default.to_string_lossy().into_owned())
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn display_settings(&self, output_dir: &Path) {
        let settings = &self.config.settings.organizer;
        println!();
        println!("  {} {}", style("輸出資料夾:").dim(), output_dir.display());
        println!("  {} {}", style("命名模式:").dim(), settings.sort_mode);
        if !settings.prefix.trim().is_empty() {
            println!("  {} {}", style("前綴:").dim(), settings.prefix.trim());
        }
        println!("  {} {}", style("放置方式:").dim(), settings.placement);
        println!();
    }

    fn confirm_start(&self) -> Result<bool> {
        let prompt = if self.config.settings.organizer.placement == PlacementAction::None {
            "開始分析並預覽結果？"
        } else {
            "確定要開始整理這些影片嗎？"
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;
        Ok(confirmed)
    }

    fn run_worker(pipeline: BatchPipeline<FfprobeProbe>, files: Vec<PathBuf>) -> Result<BatchOutcome> {
        let progress_bar = ProgressBar::new(files.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-"),
        );
        progress_bar.set_message("分析中...");

        let worker = BatchWorker::spawn(pipeline, files)?;
        for event in worker.events() {
            match event {
                BatchEvent::Progress(progress) => {
                    progress_bar.set_position(progress.processed as u64);
                    if let Some(name) = progress.current.file_name() {
                        progress_bar.set_message(name.to_string_lossy().into_owned());
                    }
                }
                BatchEvent::Result(result) => {
                    if let Some(original) = &result.duplicate_of {
                        progress_bar.println(format!(
                            "  {} {} = {}",
                            style("重複:").yellow(),
                            result.file_name,
                            original.display()
                        ));
                    }
                }
                BatchEvent::Finished(outcome) => {
                    if outcome.cancelled {
                        progress_bar.abandon_with_message("操作已中斷");
                    } else {
                        progress_bar.finish_with_message("完成");
                    }
                    break;
                }
                BatchEvent::Failed(message) => {
                    progress_bar.abandon_with_message(format!("失敗: {message}"));
                    break;
                }
            }
        }

        worker.join()
    }

    fn display_results(&self, outcome: &BatchOutcome) {
        println!();
        println!("{}", style("=== 目的地預覽 ===").cyan().bold());
        for result in outcome.results.iter().take(PREVIEW_LIMIT) {
            println!("  {} {}", style("舊:").dim(), result.path.display());
            match &result.destination_error {
                Some(error) => println!("  {} {}", style("新:").dim(), style(error).red()),
                None => println!("  {} {}", style("新:").dim(), result.destination.display()),
            }
        }
        if outcome.results.len() > PREVIEW_LIMIT {
            println!(
                "  {}",
                style(format!("... 其餘 {} 個", outcome.results.len() - PREVIEW_LIMIT)).dim()
            );
        }

        let summary = outcome.summary();
        println!();
        println!("{}", style("=== 整理結果 ===").cyan().bold());
        println!("  {}", outcome.status);
        println!("  總計: {} 個", summary.total);
        println!("  重複: {} 個", style(summary.duplicates).yellow());
        if summary.probe_failures > 0 {
            println!("  無法分析: {} 個", style(summary.probe_failures).red());
        }
        if self.config.settings.organizer.placement != PlacementAction::None {
            println!("  已放置: {} 個", style(summary.placed).green());
            if summary.placement_failures > 0 {
                println!("  放置失敗: {} 個", style(summary.placement_failures).red());
            }
        }
        for row in outcome.filtered_rows(&ReportFilter::duplicates()) {
            println!("    {} {}", style("重複:").yellow(), row.path.display());
        }
        println!("  📱 裝置資訊: {} 個", summary.with_device);
        println!("  🌍 GPS: {} 個", summary.with_gps);
        println!("  📷 鏡頭資訊: {} 個", summary.with_camera_lens);

        info!(
            "整理任務完成 - 總計: {}, 重複: {}, 無法分析: {}, 已放置: {}",
            summary.total, summary.duplicates, summary.probe_failures, summary.placed
        );
    }
}
