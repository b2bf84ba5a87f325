//! 在背景執行緒執行批次處理，透過 channel 回報事件

use super::batch_pipeline::{BatchOutcome, BatchPipeline, BatchProgress, FileResult};
use crate::tools::MetadataProbe;
use anyhow::{Context, Result, anyhow};
use log::{debug, error};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

#[derive(Debug)]
pub enum BatchEvent {
    Progress(BatchProgress),
    Result(Box<FileResult>),
    /// 正常結束或被中斷，`cancelled` 記錄在結果中
    Finished(BatchOutcome),
    /// 結構性錯誤，例如無法建立目的地資料夾
    Failed(String),
}

pub struct BatchWorker {
    handle: Option<JoinHandle<Result<BatchOutcome>>>,
    events: Receiver<BatchEvent>,
    stop_signal: Arc<AtomicBool>,
}

impl BatchWorker {
    /// 啟動背景執行緒；每個檔案先送出 `Progress` 再送出 `Result`，最後一定是 `Finished` 或 `Failed`
    pub fn spawn<P>(mut pipeline: BatchPipeline<P>, files: Vec<PathBuf>) -> Result<Self>
    where
        P: MetadataProbe + Send + 'static,
    {
        let (sender, events) = mpsc::channel();
        let stop_signal = pipeline.shutdown_signal();

        let handle = thread::Builder::new()
            .name("batch-worker".to_string())
            .spawn(move || {
                debug!("背景處理開始，共 {} 個檔案", files.len());
                // 接收端被丟棄時送出失敗是正常的，忽略即可
                let outcome = pipeline.run(&files, |progress, result| {
                    let _ = sender.send(BatchEvent::Progress(progress.clone()));
                    let _ = sender.send(BatchEvent::Result(Box::new(result.clone())));
                });

                match &outcome {
                    Ok(outcome) => {
                        let _ = sender.send(BatchEvent::Finished(outcome.clone()));
                    }
                    Err(e) => {
                        error!("批次處理失敗: {e:#}");
                        let _ = sender.send(BatchEvent::Failed(format!("{e:#}")));
                    }
                }
                outcome
            })
            .context("無法建立背景執行緒")?;

        Ok(Self {
            handle: Some(handle),
            events,
            stop_signal,
        })
    }

    #[must_use]
    pub const fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// 要求在目前檔案處理完後停止
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }

    /// 等待背景執行緒結束並取回結果
    pub fn join(mut self) -> Result<BatchOutcome> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("背景執行緒已被回收"))?;
        handle
            .join()
            .map_err(|_| anyhow!("背景執行緒異常結束"))?
    }
}
