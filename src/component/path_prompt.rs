//! 各元件共用的路徑輸入

use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::warn;
use std::path::PathBuf;

/// 多個路徑以分號分隔
const PATH_SEPARATOR: char = ';';

/// 從最近使用的路徑選擇，或輸入新的路徑（可用 `;` 分隔多個）
///
/// 選到的路徑會寫回最近使用清單
pub fn prompt_input_paths(config: &mut Config, prompt: &str) -> Result<Vec<PathBuf>> {
    let raw = if config.settings.recent_paths.is_empty() {
        prompt_new_path(prompt)?
    } else {
        let mut items: Vec<String> = config.settings.recent_paths.clone();
        items.push("輸入新路徑...".to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()?;

        if selection == items.len() - 1 {
            prompt_new_path(prompt)?
        } else {
            items[selection].clone()
        }
    };

    let paths = split_paths(&raw);
    if !paths.is_empty() {
        add_recent_path(&mut config.settings, raw.trim());
        if let Err(e) = save_settings(&config.settings) {
            warn!("無法儲存最近使用的路徑: {e:#}");
        }
    }

    Ok(paths)
}

fn prompt_new_path(prompt: &str) -> Result<String> {
    let path: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(path)
}

/// 拆分使用者輸入的路徑，去除空白與拖放時常見的引號
#[must_use]
pub fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(PATH_SEPARATOR)
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paths() {
        assert_eq!(
            split_paths(" /a ; '/b c' ;; \"/d\" "),
            vec![
                PathBuf::from("/a"),
                PathBuf::from("/b c"),
                PathBuf::from("/d")
            ]
        );
        assert!(split_paths("  ").is_empty());
    }
}
