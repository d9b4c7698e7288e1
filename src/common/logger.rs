//! 日志初始化

use log::LevelFilter;

/// 初始化 env_logger
///
/// 默认级别为 info，可通过 `RUST_LOG` 覆盖。日志输出到 stderr，
/// 标准输出只保留给各程序的状态行。
pub fn init() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
