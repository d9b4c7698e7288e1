// src/hat/st7789.rs

//! Display HAT Mini 硬件驱动
//!
//! ST7789 面板挂在 SPI0 CE1 上，DC 使用 GPIO9；
//! 背光在 GPIO13，RGB 指示灯在 GPIO17/27/22（低电平点亮）。

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_hal::digital::OutputPin;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::{self, Direction};
use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};
use log::{debug, info, warn};
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, Orientation, Rotation};
use mipidsi::{Builder, Display, NoResetPin};

use super::pwm::SysfsPwm;
use super::{DisplayHat, HEIGHT, WIDTH, clamp_level, ensure_frame_size};
use crate::common::config::HatConfig;
use crate::common::error::{AppError, Result};
use crate::graphics::FrameBuffer;

/// 面板原生分辨率（竖屏）
const NATIVE_WIDTH: u16 = 240;
const NATIVE_HEIGHT: u16 = 320;

/// mipidsi 的 SPI 命令缓冲区大小
const SPI_BUFFER_SIZE: usize = 512;

/// sysfs GPIO 根目录
const GPIO_ROOT: &str = "/sys/class/gpio";

type HatInterface = SpiInterface<'static, SpidevDevice, SysfsPin>;

/// 背光控制方式
enum Backlight {
    Pwm(SysfsPwm),
    Gpio(SysfsPin),
}

/// Display HAT Mini 硬件句柄
pub struct St7789Hat {
    display: Display<HatInterface, ST7789, NoResetPin>,
    backlight: Backlight,
    leds: [SysfsPin; 3],
}

/// `connect` 过程中已导出的 GPIO 编号，drop 时逐个取消导出
///
/// 中途失败时引脚随之释放；成功后调用 `keep`，引脚保持导出，
/// 进程退出后背光和画面维持原状。
struct ExportedPins {
    root: PathBuf,
    pins: Vec<u64>,
}

impl ExportedPins {
    fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pins: Vec::new(),
        }
    }

    fn track(&mut self, pin: u64) {
        self.pins.push(pin);
    }

    fn keep(mut self) {
        self.pins.clear();
    }
}

impl Drop for ExportedPins {
    fn drop(&mut self) {
        let unexport = self.root.join("unexport");
        for pin in self.pins.drain(..).rev() {
            let result = OpenOptions::new()
                .append(true)
                .open(&unexport)
                .and_then(|mut f| writeln!(f, "{}", pin));
            match result {
                Ok(()) => debug!("GPIO{} unexported", pin),
                Err(e) => debug!("GPIO{} unexport failed: {}", pin, e),
            }
        }
    }
}

/// 导出 GPIO 并设置方向
fn init_gpio(
    exports: &mut ExportedPins,
    pin: u64,
    direction: Direction,
) -> core::result::Result<SysfsPin, sysfs_gpio::Error> {
    let gpio = SysfsPin::new(pin);
    gpio.export()?;
    exports.track(pin);

    for _ in 0..50 {
        if gpio.is_exported() {
            break;
        }
        std::thread::sleep(Duration::from_millis(2));
    }

    gpio.set_direction(direction)?;
    Ok(gpio)
}

fn gpio_init_error(pin: u64) -> impl Fn(sysfs_gpio::Error) -> AppError {
    move |e| AppError::DisplayInit(format!("GPIO{}: {}", pin, e))
}

fn rotation(degrees: u16) -> Result<Rotation> {
    match degrees {
        0 => Ok(Rotation::Deg0),
        90 => Ok(Rotation::Deg90),
        180 => Ok(Rotation::Deg180),
        270 => Ok(Rotation::Deg270),
        other => Err(AppError::Config(format!(
            "rotation must be 0, 90, 180 or 270, got {}",
            other
        ))),
    }
}

fn open_backlight(
    exports: &mut ExportedPins,
    config: &HatConfig,
    pwm: bool,
) -> Result<Backlight> {
    if pwm {
        match SysfsPwm::open(
            &config.backlight_pwm_chip,
            config.backlight_pwm_channel,
            config.backlight_pwm_period_ns,
        ) {
            Ok(channel) => return Ok(Backlight::Pwm(channel)),
            Err(e) => warn!(
                "PWM backlight unavailable ({}), falling back to on/off GPIO{}",
                e, config.backlight_pin
            ),
        }
    }

    // 背光默认点亮
    let pin = init_gpio(exports, config.backlight_pin, Direction::High)
        .map_err(gpio_init_error(config.backlight_pin))?;
    Ok(Backlight::Gpio(pin))
}

impl DisplayHat for St7789Hat {
    fn connect(config: &HatConfig, backlight_pwm: bool) -> Result<Self> {
        info!(
            "Initializing Display HAT Mini on {}",
            config.spi_device.display()
        );

        let rotation = rotation(config.rotation)?;

        let mut exports = ExportedPins::new(GPIO_ROOT);
        let dc = init_gpio(&mut exports, config.dc_pin, Direction::Low)
            .map_err(gpio_init_error(config.dc_pin))?;

        // 指示灯低电平点亮，初始化为熄灭
        let [r, g, b] = config.led_pins;
        let leds = [
            init_gpio(&mut exports, r, Direction::High).map_err(gpio_init_error(r))?,
            init_gpio(&mut exports, g, Direction::High).map_err(gpio_init_error(g))?,
            init_gpio(&mut exports, b, Direction::High).map_err(gpio_init_error(b))?,
        ];

        let backlight = open_backlight(&mut exports, config, backlight_pwm)?;

        let mut spi = SpidevDevice::open(&config.spi_device).map_err(|e| {
            AppError::DisplayInit(format!("{}: {:?}", config.spi_device.display(), e))
        })?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.spi_speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).map_err(|e| {
            AppError::DisplayInit(format!("{}: {}", config.spi_device.display(), e))
        })?;

        // 句柄存活到进程结束，缓冲区直接泄漏为 'static
        let spi_buffer: &'static mut [u8] = Box::leak(Box::new([0u8; SPI_BUFFER_SIZE]));
        let di = SpiInterface::new(spi, dc, spi_buffer);

        let mut delay = Delay;
        let display = Builder::new(ST7789, di)
            .display_size(NATIVE_WIDTH, NATIVE_HEIGHT)
            .orientation(Orientation {
                rotation,
                mirrored: false,
            })
            .invert_colors(ColorInversion::Inverted)
            .init(&mut delay)
            .map_err(|e| AppError::DisplayInit(format!("ST7789 init: {:?}", e)))?;

        exports.keep();
        info!("Display HAT Mini initialized ({}x{})", WIDTH, HEIGHT);
        Ok(Self {
            display,
            backlight,
            leds,
        })
    }

    fn set_backlight(&mut self, level: f32) -> Result<()> {
        let level = clamp_level(level);
        match &mut self.backlight {
            Backlight::Pwm(channel) => channel
                .set_level(level)
                .map_err(|e| AppError::Backlight(e.to_string()))?,
            Backlight::Gpio(pin) => {
                let result = if level > 0.0 {
                    pin.set_high()
                } else {
                    pin.set_low()
                };
                result.map_err(|e| AppError::Backlight(format!("{:?}", e)))?;
            }
        }
        debug!("Backlight set to {:.2}", level);
        Ok(())
    }

    fn set_led(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        for (pin, level) in self.leds.iter_mut().zip([r, g, b]) {
            let result = if clamp_level(level) > 0.0 {
                pin.set_low()
            } else {
                pin.set_high()
            };
            result.map_err(|e| AppError::Led(format!("{:?}", e)))?;
        }
        debug!("LED set to ({:.2}, {:.2}, {:.2})", r, g, b);
        Ok(())
    }

    fn display(&mut self, buffer: &FrameBuffer) -> Result<()> {
        ensure_frame_size(buffer)?;

        let colors = buffer.pixels().iter().map(|&c: &Rgb888| Rgb565::from(c));
        self.display
            .set_pixels(0, 0, (WIDTH - 1) as u16, (HEIGHT - 1) as u16, colors)
            .map_err(|e| AppError::DisplayUpdateFailed(format!("{:?}", e)))?;

        debug!("Frame committed to panel");
        Ok(())
    }
}
