use env_logger::{Builder, Env, Target};

/// 預設的日誌等級，可用 `RUST_LOG` 覆蓋
const DEFAULT_LOG_FILTER: &str = "info";

/// 初始化日誌，輸出到 stderr 以免干擾互動畫面
pub fn init() {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    // 重複初始化（例如測試中）時忽略錯誤
    let _ = Builder::from_env(env)
        .target(Target::Stderr)
        .format_timestamp_secs()
        .try_init();
}
