use crate::config::save::save_settings;
use crate::config::{Config, Language, PlacementAction, SortMode};
use crate::menu::handlers::{run_duplication_checker, run_input_normalizer, run_video_organizer};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_organize"),
        t!("main_menu.opt_dedup"),
        t!("main_menu.opt_sanitize"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_video_organizer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_duplication_checker(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(2) => {
            run_input_normalizer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(3) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(4) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_sort_mode"),
            t!("settings.opt_prefix"),
            t!("settings.opt_placement"),
            t!("settings.opt_toggles"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => {
                let current = config.settings.organizer.sort_mode;
                if let Some(mode) =
                    select_option(term, &t!("settings.sort_mode.title"), &SortMode::all(), current)?
                {
                    config.settings.organizer.sort_mode = mode;
                    save_and_notify(config, mode)?;
                }
            }
            Some(1) => show_prefix_menu(term, config)?,
            Some(2) => {
                let actions = [
                    PlacementAction::None,
                    PlacementAction::Move,
                    PlacementAction::Copy,
                ];
                let current = config.settings.organizer.placement;
                if let Some(action) =
                    select_option(term, &t!("settings.placement.title"), &actions, current)?
                {
                    config.settings.organizer.placement = action;
                    save_and_notify(config, action)?;
                }
            }
            Some(3) => show_toggles_menu(term, config)?,
            Some(4) => {
                let languages = [Language::EnUs, Language::ZhTw];
                let current = config.settings.language;
                if let Some(language) =
                    select_option(term, &t!("settings.language.title"), &languages, current)?
                {
                    config.settings.language = language;
                    rust_i18n::set_locale(language.as_str());
                    save_and_notify(config, language)?;
                }
            }
            Some(5) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 顯示選項清單，選到與目前不同的值才回傳
fn select_option<T>(term: &Term, title: &str, options: &[T], current: T) -> Result<Option<T>>
where
    T: Copy + PartialEq + Display,
{
    term.clear_screen()?;

    println!("{}", style(title).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!("\n{} {}", style(t!("settings.current")).dim(), current);
    println!();

    let items: Vec<String> = options.iter().map(ToString::to_string).collect();
    let default_index = options.iter().position(|&o| o == current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(title)
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    Ok(selection
        .map(|index| options[index])
        .filter(|&selected| selected != current))
}

fn show_prefix_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.prefix.title")).cyan().bold());

    let prefix: String = Input::new()
        .with_prompt(t!("settings.prefix.prompt"))
        .with_initial_text(config.settings.organizer.prefix.clone())
        .allow_empty(true)
        .interact_text_on(term)?;
    let prefix = prefix.trim().to_string();

    if prefix != config.settings.organizer.prefix {
        config.settings.organizer.prefix = prefix.clone();
        save_and_notify(config, prefix)?;
    }

    Ok(())
}

/// 開關類設定
fn show_toggles_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.toggles.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let settings = &config.settings;
        let options = vec![
            toggle_label(&t!("settings.toggles.skip_duplicates"), settings.organizer.skip_duplicates),
            toggle_label(&t!("settings.toggles.sanitize_inputs"), settings.sanitize_inputs),
            toggle_label(
                &t!("settings.toggles.extended_extensions"),
                settings.include_extended_extensions,
            ),
            t!("settings.back").to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let settings = &mut config.settings;
        match selection {
            Some(0) => settings.organizer.skip_duplicates = !settings.organizer.skip_duplicates,
            Some(1) => settings.sanitize_inputs = !settings.sanitize_inputs,
            Some(2) => {
                settings.include_extended_extensions = !settings.include_extended_extensions;
            }
            Some(3) | None => break,
            _ => unreachable!(),
        }
        save_settings(&config.settings)?;
    }

    Ok(())
}

fn toggle_label(label: &str, enabled: bool) -> String {
    let mark = if enabled { "[x]" } else { "[ ]" };
    format!("{mark} {label}")
}

fn save_and_notify(config: &Config, value: impl Display) -> Result<()> {
    save_settings(&config.settings)?;
    println!("\n{} {}", style(t!("settings.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
    Ok(())
}
