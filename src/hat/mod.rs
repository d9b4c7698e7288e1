//! Display HAT Mini 驱动接口
//!
//! 本模块定义了屏幕句柄的通用接口，并根据编译特性选择具体实现：
//! - `display_hat`：真实硬件（ST7789 + sysfs GPIO/PWM）
//! - `simulator`：把每一帧写成PNG文件

use crate::common::config::HatConfig;
use crate::common::error::{AppError, Result};
use crate::graphics::FrameBuffer;

#[cfg(feature = "simulator")]
pub mod simulator;
#[cfg(feature = "display_hat")]
pub mod st7789;
#[cfg(feature = "display_hat")]
mod pwm;

#[cfg(test)]
pub mod mock;

#[cfg(not(any(feature = "simulator", feature = "display_hat")))]
compile_error!("You must enable at least one of: display_hat or simulator.");

/// 当前平台使用的屏幕实现，两个特性同时开启时优先真实硬件
#[cfg(feature = "display_hat")]
pub type PlatformHat = st7789::St7789Hat;
#[cfg(all(feature = "simulator", not(feature = "display_hat")))]
pub type PlatformHat = simulator::SimulatorHat;

/// 屏幕分辨率（横屏）
pub const WIDTH: u32 = 320;
pub const HEIGHT: u32 = 240;

/// 屏幕句柄
///
/// 独占面板、背光和指示灯，释放时归还硬件。
pub trait DisplayHat: Sized {
    /// 打开硬件
    ///
    /// # 参数
    /// - `config`: 接线配置
    /// - `backlight_pwm`: 背光是否使用PWM调光，否则只有开和关
    fn connect(config: &HatConfig, backlight_pwm: bool) -> Result<Self>;

    /// 设置背光亮度（0.0 - 1.0）
    fn set_backlight(&mut self, level: f32) -> Result<()>;

    /// 设置指示灯颜色，每个通道 0.0 - 1.0
    fn set_led(&mut self, r: f32, g: f32, b: f32) -> Result<()>;

    /// 将整个帧缓冲区提交到面板
    fn display(&mut self, buffer: &FrameBuffer) -> Result<()>;
}

/// 创建与面板分辨率一致的帧缓冲区
pub fn frame_buffer() -> FrameBuffer {
    FrameBuffer::new(WIDTH, HEIGHT)
}

/// 检查帧缓冲区尺寸是否与面板一致
pub fn ensure_frame_size(buffer: &FrameBuffer) -> Result<()> {
    if buffer.width() != WIDTH || buffer.height() != HEIGHT {
        return Err(AppError::FrameSizeMismatch {
            expected_width: WIDTH,
            expected_height: HEIGHT,
            actual_width: buffer.width(),
            actual_height: buffer.height(),
        });
    }
    Ok(())
}

/// 将亮度限制到 0.0 - 1.0，NaN 视为 0
pub(crate) fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
