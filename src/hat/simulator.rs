//! 模拟屏幕：把每次提交的帧写成PNG文件，背光和指示灯只打印日志

use std::path::PathBuf;

use log::info;

use super::{DisplayHat, clamp_level, ensure_frame_size};
use crate::common::config::HatConfig;
use crate::common::error::{AppError, Result};
use crate::graphics::FrameBuffer;

pub struct SimulatorHat {
    output: PathBuf,
    backlight: f32,
    led: (f32, f32, f32),
    frames: usize,
}

impl SimulatorHat {
    /// 已提交的帧数
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn backlight(&self) -> f32 {
        self.backlight
    }

    pub fn led(&self) -> (f32, f32, f32) {
        self.led
    }
}

impl DisplayHat for SimulatorHat {
    fn connect(config: &HatConfig, backlight_pwm: bool) -> Result<Self> {
        info!(
            "Simulated Display HAT Mini, frames go to {} (backlight pwm: {})",
            config.simulator_output.display(),
            backlight_pwm
        );
        Ok(Self {
            output: config.simulator_output.clone(),
            backlight: 1.0,
            led: (0.0, 0.0, 0.0),
            frames: 0,
        })
    }

    fn set_backlight(&mut self, level: f32) -> Result<()> {
        self.backlight = clamp_level(level);
        info!("[Simulator] Backlight: {:.2}", self.backlight);
        Ok(())
    }

    fn set_led(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        self.led = (clamp_level(r), clamp_level(g), clamp_level(b));
        info!("[Simulator] LED: {:?}", self.led);
        Ok(())
    }

    fn display(&mut self, buffer: &FrameBuffer) -> Result<()> {
        ensure_frame_size(buffer)?;
        buffer
            .to_rgb_image()
            .save(&self.output)
            .map_err(|e| AppError::DisplayUpdateFailed(e.to_string()))?;
        self.frames += 1;
        info!(
            "[Simulator] Frame {} written to {}",
            self.frames,
            self.output.display()
        );
        Ok(())
    }
}
