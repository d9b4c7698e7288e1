// src/common/mod.rs

/// 公共模块定义
///
/// 包含配置、错误处理和日志初始化
pub mod config;
pub mod error;
pub mod logger;

pub use config::{HatConfig, LogoConfig, SplashConfig, UptimeConfig};
pub use error::{AppError, Result};
