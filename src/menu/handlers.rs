use crate::component::{DuplicationChecker, InputNormalizer, VideoOrganizer};
use crate::config::Config;
use crate::pause;
use crate::signal::reset_shutdown_signal;
use anyhow::Result;
use console::{Term, style};
use log::error;
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 元件各自持有設定副本，結束後把最近使用的路徑寫回
fn sync_recent_paths(config: &mut Config, component_config: &Config) {
    config.settings.recent_paths = component_config.settings.recent_paths.clone();
}

fn report_error(e: &anyhow::Error) {
    error!("{e:#}");
    eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
}

pub fn run_video_organizer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    reset_shutdown_signal(shutdown_signal);
    let mut organizer = VideoOrganizer::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = organizer.run() {
        report_error(&e);
    }
    sync_recent_paths(config, organizer.config());

    pause(term)?;
    Ok(())
}

pub fn run_duplication_checker(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    reset_shutdown_signal(shutdown_signal);
    let mut checker = DuplicationChecker::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = checker.run() {
        report_error(&e);
    }
    sync_recent_paths(config, checker.config());

    pause(term)?;
    Ok(())
}

pub fn run_input_normalizer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    reset_shutdown_signal(shutdown_signal);
    let mut normalizer = InputNormalizer::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = normalizer.run() {
        report_error(&e);
    }
    sync_recent_paths(config, normalizer.config());

    pause(term)?;
    Ok(())
}
