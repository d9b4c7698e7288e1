//! 开机运行时间画面

use std::path::Path;

use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{OriginDimensions, Point, Primitive};
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::info;

use crate::common::config::SplashConfig;
use crate::common::error::{AppError, Result};
use crate::graphics::FrameBuffer;
use crate::graphics::text::{SplashFonts, load_fonts};
use crate::hat::{self, DisplayHat, PlatformHat};

/// 画面布局，位置和颜色固定不可配置
pub struct UptimeLayout;

impl UptimeLayout {
    pub const TITLE: &'static str = "UPTIME";

    pub const TITLE_Y: i32 = 30;
    pub const CLOCK_Y: i32 = 80;
    pub const DETAIL_Y: i32 = 120;

    pub const TITLE_COLOR: Rgb888 = Rgb888::new(255, 255, 255);
    pub const CLOCK_COLOR: Rgb888 = Rgb888::new(0, 255, 0);
    pub const DETAIL_COLOR: Rgb888 = Rgb888::new(100, 100, 255);
}

/// 一次运行时间读数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UptimeReading {
    pub total_seconds: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl UptimeReading {
    /// 把总秒数拆成时、分、秒，小时不按24取模
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
            seconds: total_seconds % 60,
        }
    }

    /// 解析 `/proc/uptime` 格式的文本：取第一个字段并向零截断
    pub fn parse(text: &str) -> Result<Self> {
        let field = text
            .split_whitespace()
            .next()
            .ok_or_else(|| AppError::UptimeParse(text.to_string()))?;
        let value: f64 = field
            .parse()
            .map_err(|_| AppError::UptimeParse(field.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::UptimeParse(field.to_string()));
        }
        Ok(Self::from_seconds(value.trunc() as u64))
    }

    /// 读取运行时间源文件
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::UptimeSource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// `HH:MM:SS`
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// `<N> seconds`
    pub fn detail(&self) -> String {
        format!("{} seconds", self.total_seconds)
    }

    /// 提交成功后打印到 stdout 的确认行
    pub fn confirmation(&self) -> String {
        format!("Displayed uptime: {} ({})", self.clock(), self.detail())
    }
}

/// 把运行时间画到帧缓冲区
///
/// 先清成黑色，再以屏幕水平中线为中心画三行文字。
pub fn render_uptime(
    buffer: &mut FrameBuffer,
    fonts: &mut SplashFonts,
    reading: &UptimeReading,
) -> Result<()> {
    let center_x = (buffer.width() / 2) as i32;

    Rectangle::new(Point::zero(), buffer.size())
        .into_styled(PrimitiveStyle::with_fill(Rgb888::BLACK))
        .draw(buffer)
        .ok();

    fonts.title.draw_centered(
        buffer,
        UptimeLayout::TITLE,
        Point::new(center_x, UptimeLayout::TITLE_Y),
        UptimeLayout::TITLE_COLOR,
    )?;
    fonts.title.draw_centered(
        buffer,
        &reading.clock(),
        Point::new(center_x, UptimeLayout::CLOCK_Y),
        UptimeLayout::CLOCK_COLOR,
    )?;
    fonts.detail.draw_centered(
        buffer,
        &reading.detail(),
        Point::new(center_x, UptimeLayout::DETAIL_Y),
        UptimeLayout::DETAIL_COLOR,
    )?;

    Ok(())
}

/// 显示一次运行时间画面
///
/// 除字体外任何失败都直接返回错误。
pub fn show_uptime<H: DisplayHat>(hat: &mut H, config: &SplashConfig) -> Result<UptimeReading> {
    let mut buffer = hat::frame_buffer();
    let uptime = &config.uptime;
    let mut fonts = load_fonts(
        &uptime.title_font,
        uptime.title_font_size,
        &uptime.detail_font,
        uptime.detail_font_size,
    );
    let reading = UptimeReading::read(&uptime.source)?;

    render_uptime(&mut buffer, &mut fonts, &reading)?;
    hat.display(&buffer)?;

    info!("Uptime splash committed: {}", reading.clock());
    Ok(reading)
}

/// 程序入口：打开屏幕（背光不用PWM）并显示
pub fn run(config: &SplashConfig) -> Result<UptimeReading> {
    let mut hat = PlatformHat::connect(&config.hat, false)?;
    show_uptime(&mut hat, config)
}
