use tracing_subscriber::{fmt, EnvFilter};

/// stderr へのログ出力を初期化する。`RUST_LOG` が設定されていればそちらを優先
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // 二重初期化（テストなど）は無視する
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
