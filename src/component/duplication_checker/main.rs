use super::duplicate_scanner::{
    DuplicateMoveResult, DuplicateScanResult, find_duplicates, is_in_duplication_folder,
    move_duplicates,
};
use crate::component::path_prompt::prompt_input_paths;
use crate::config::Config;
use crate::tools::{scan_video_files, validate_directory_exists};
use anyhow::{Result, bail};
use console::style;
use dialoguer::Confirm;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub struct DuplicationChecker {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl DuplicationChecker {
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
        println!("{}", style("=== 重複影片檢查 ===").cyan().bold());

        let directory = self.prompt_directory()?;
        validate_directory_exists(&directory)?;

        println!("{}", style("掃描影片檔案中...").dim());
        let files: Vec<PathBuf> = scan_video_files(
            &directory,
            &self.config.video_extensions,
            self.config.settings.include_extended_extensions,
        )
        .into_iter()
        .filter(|path| !is_in_duplication_folder(path, &directory))
        .collect();

        if files.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(());
        }

        println!("{}", style("比對內容指紋中...").dim());
        let scan = find_duplicates(&files, &self.shutdown_signal);
        self.display_pairs(&scan);

        if scan.cancelled {
            println!("{}", style("操作已中斷").yellow());
            return Ok(());
        }
        if scan.pairs.is_empty() {
            return Ok(());
        }

        let confirmed = Confirm::new()
            .with_prompt("要將重複檔案移到 duplication_file 資料夾嗎？")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", style("未移動任何檔案").yellow());
            return Ok(());
        }

        let moved = move_duplicates(&scan.pairs, &directory)?;
        self.display_moved(&moved);

        Ok(())
    }

    fn prompt_directory(&mut self) -> Result<PathBuf> {
        let mut paths = prompt_input_paths(&mut self.config, "請輸入要檢查的資料夾路徑")?;
        if paths.len() > 1 {
            bail!("一次只能檢查一個資料夾");
        }
        match paths.pop() {
            Some(path) => Ok(path),
            None => bail!("未輸入資料夾路徑"),
        }
    }

    fn display_pairs(&self, scan: &DuplicateScanResult) {
        println!();
        println!("{}", style("=== 重複檢查摘要 ===").cyan().bold());
        println!("  總計掃描: {} 個檔案", scan.total_files);
        println!("  發現重複: {} 個", style(scan.pairs.len()).yellow());
        if scan.unfingerprintable > 0 {
            println!("  無法比對: {} 個", style(scan.unfingerprintable).dim());
        }

        for pair in &scan.pairs {
            println!(
                "  {} {}\n    {} {}",
                style("重複:").yellow(),
                pair.duplicate.display(),
                style("原始:").dim(),
                pair.original.display()
            );
        }
    }

    fn display_moved(&self, result: &DuplicateMoveResult) {
        println!();
        println!(
            "  已移動重複: {} 個",
            style(result.moved.len()).green()
        );
        if result.errors > 0 {
            println!("  錯誤: {} 個", style(result.errors).red());
        }

        info!(
            "去重任務完成 - 移動: {}, 錯誤: {}",
            result.moved.len(),
            result.errors
        );
    }
}
