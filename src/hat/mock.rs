//! 测试用的屏幕实现，记录所有调用，可按需注入故障

use std::time::Instant;

use super::{DisplayHat, ensure_frame_size};
use crate::common::config::HatConfig;
use crate::common::error::{AppError, Result};
use crate::graphics::FrameBuffer;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Backlight(f32),
    Led(f32, f32, f32),
    Display,
}

#[derive(Debug, Default)]
pub struct MockHat {
    pub calls: Vec<Call>,
    /// 每次提交的帧和提交时刻
    pub frames: Vec<(FrameBuffer, Instant)>,
    /// 第 n 次调用（从0计）时返回错误
    pub fail_at: Option<usize>,
}

impl MockHat {
    pub fn failing_at(step: usize) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    fn record(&mut self, call: Call) -> Result<()> {
        let step = self.calls.len();
        self.calls.push(call);
        if self.fail_at == Some(step) {
            return Err(AppError::DisplayUpdateFailed(format!(
                "injected failure at step {step}"
            )));
        }
        Ok(())
    }
}

impl DisplayHat for MockHat {
    fn connect(_config: &HatConfig, _backlight_pwm: bool) -> Result<Self> {
        Ok(Self::default())
    }

    fn set_backlight(&mut self, level: f32) -> Result<()> {
        self.record(Call::Backlight(level))
    }

    fn set_led(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        self.record(Call::Led(r, g, b))
    }

    fn display(&mut self, buffer: &FrameBuffer) -> Result<()> {
        ensure_frame_size(buffer)?;
        self.record(Call::Display)?;
        self.frames.push((buffer.clone(), Instant::now()));
        Ok(())
    }
}
