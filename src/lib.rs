//! Display HAT Mini 开机工具库
//!
//! 提供屏幕存在性探测、开机运行时间画面和Logo画面三个功能，
//! 每个功能对应 `src/bin` 下的一个独立可执行程序。

pub mod app;
pub mod common;
pub mod graphics;
pub mod hat;

pub use common::error::{AppError, Result};
