//! 檔名清理主模組

use super::root_normalizer::normalize_roots;
use super::tree_sanitizer::sanitize_inputs;
use crate::component::path_prompt::prompt_input_paths;
use crate::config::Config;
use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 互動式清理輸入路徑下所有檔案與資料夾名稱
pub struct InputNormalizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl InputNormalizer {
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
        println!("{}", style("=== 清理檔案名稱 ===").cyan().bold());

        let inputs = prompt_input_paths(&mut self.config, "請輸入檔案或資料夾路徑")?;
        let roots = normalize_roots(&inputs);

        if roots.is_empty() {
            println!("{}", style("No valid files or folders were provided.").yellow());
            return Ok(());
        }

        println!();
        println!("{}", style("將處理以下路徑：").cyan());
        for root in &roots {
            println!("  {}", root.display());
        }
        println!();

        let confirmed = Confirm::new()
            .with_prompt("確定要清理這些路徑下的名稱嗎？")
            .default(false)
            .interact()?;
        if !confirmed || self.shutdown_signal.load(Ordering::SeqCst) {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        let summary = sanitize_inputs(&roots);

        println!();
        println!("{}", style("=== 清理結果 ===").cyan().bold());
        println!("  檔案改名: {} 個", style(summary.files_renamed).green());
        println!("  資料夾改名: {} 個", style(summary.dirs_renamed).green());
        for (before, after) in &summary.renamed_roots {
            println!("  {} {} -> {}", style("根目錄:").dim(), before.display(), after.display());
        }

        info!(
            "清理任務完成 - 根路徑: {}, 檔案: {}, 資料夾: {}",
            summary.roots.len(),
            summary.files_renamed,
            summary.dirs_renamed
        );

        Ok(())
    }
}
