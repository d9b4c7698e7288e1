//! 屏幕存在性探测
//!
//! 通过真实的硬件操作判断 Display HAT Mini 是否连接：
//! 打开句柄 → 关背光 → 提交两次空帧 → 背光调到50%。
//! 任一步失败即认为屏幕不存在，不重试。

use std::io::Write;
use std::process::ExitCode;

use log::{debug, info};

use crate::common::config::HatConfig;
use crate::common::error::Result;
use crate::hat::{self, DisplayHat, PlatformHat};

/// 探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Present,
    /// 屏幕不存在或探测出错，附带原因
    Absent(String),
}

impl Presence {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }

    /// 输出探测结论并给出退出码
    ///
    /// 存在时向 `out` 写一行提示，返回 0；不存在时向 `err` 写原因、
    /// 向 `out` 写结论，返回 1。写入失败不影响退出码。
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> ExitCode {
        match self {
            Presence::Present => {
                writeln!(out, "Display HAT Mini seems present!").ok();
                ExitCode::SUCCESS
            }
            Presence::Absent(reason) => {
                writeln!(err, "Error detecting Display HAT Mini: {}", reason).ok();
                writeln!(out, "No Display HAT Mini detected.").ok();
                ExitCode::FAILURE
            }
        }
    }
}

fn probe_sequence<H: DisplayHat>(connect: impl FnOnce() -> Result<H>) -> Result<()> {
    let mut hat = connect()?;
    let buffer = hat::frame_buffer();

    hat.set_backlight(0.0)?;
    hat.display(&buffer)?;
    hat.display(&buffer)?;
    hat.set_backlight(0.5)?;
    Ok(())
}

/// 执行探测序列
///
/// # 参数
/// - `connect`: 打开屏幕句柄
///
/// # 返回值
/// - `Presence`: 序列全部成功为 `Present`，否则为带错误描述的 `Absent`
pub fn probe<H: DisplayHat>(connect: impl FnOnce() -> Result<H>) -> Presence {
    match probe_sequence(connect) {
        Ok(()) => {
            info!("Display HAT Mini responded to probe");
            Presence::Present
        }
        Err(e) => {
            // 原因由调用方输出到 stderr
            debug!("Display HAT Mini probe failed: {}", e);
            Presence::Absent(e.to_string())
        }
    }
}

/// 使用当前平台的屏幕实现探测，背光使用PWM
pub fn detect(config: &HatConfig) -> Presence {
    probe(|| PlatformHat::connect(config, true))
}
