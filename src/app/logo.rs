//! 开机Logo画面
//!
//! 先提交一帧黑屏，再把Logo拉伸到整屏（不保持宽高比）、关闭指示灯、
//! 提交，然后保持一段时间再退出。

use std::path::Path;
use std::time::{Duration, Instant};

use image::RgbImage;
use image::imageops::FilterType;
use log::info;

use crate::common::config::SplashConfig;
use crate::common::error::{AppError, Result};
use crate::graphics::FrameBuffer;
use crate::hat::{self, DisplayHat, PlatformHat};

/// 读取Logo图片并转为RGB8，文件缺失或损坏即失败
pub fn load_logo(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|source| AppError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Loaded logo {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// 缩放到指定尺寸，宽高比不保留
pub fn fit_to_frame(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    image::imageops::resize(image, width, height, FilterType::CatmullRom)
}

/// 把Logo铺满整个帧缓冲区
pub fn render_logo(buffer: &mut FrameBuffer, logo: &RgbImage) {
    let fitted = fit_to_frame(logo, buffer.width(), buffer.height());
    buffer.paste(&fitted, 0, 0);
}

/// 显示Logo并保持
///
/// # 返回值
/// - `Instant`: 最后一次提交完成的时刻；函数返回时距该时刻至少经过了保持时间
pub fn show_logo<H: DisplayHat>(hat: &mut H, config: &SplashConfig) -> Result<Instant> {
    let mut buffer = hat::frame_buffer();
    hat.display(&buffer)?;

    let logo = load_logo(&config.logo.image)?;
    render_logo(&mut buffer, &logo);
    hat.set_led(0.0, 0.0, 0.0)?;

    hat.display(&buffer)?;
    let committed = Instant::now();

    let dwell = Duration::from_millis(config.logo.dwell_ms);
    info!("Logo splash committed, holding for {:?}", dwell);
    std::thread::sleep(dwell);

    Ok(committed)
}

/// 程序入口：打开屏幕（背光不用PWM）并显示Logo
pub fn run(config: &SplashConfig) -> Result<()> {
    let mut hat = PlatformHat::connect(&config.hat, false)?;
    show_logo(&mut hat, config)?;
    Ok(())
}
