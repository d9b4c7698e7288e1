//! 三个开机工具的业务逻辑
//!
//! 每个子模块对外提供一个 `run`/`detect` 入口，供 `src/bin` 中的程序调用；
//! 其余函数对屏幕句柄泛型，便于在没有硬件时测试。

pub mod detect;
pub mod logo;
pub mod uptime;
