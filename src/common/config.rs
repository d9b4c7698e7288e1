// src/common/config.rs
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use super::error::{AppError, Result};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "DISPLAYHAT_CONFIG";

/// 未设置环境变量时尝试的配置文件
pub const DEFAULT_CONFIG_PATH: &str = "/etc/displayhat/splash.json";

/// 全部工具共用的配置
///
/// 所有字段都有默认值，配置文件只需写出要覆盖的键。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    pub hat: HatConfig,
    pub uptime: UptimeConfig,
    pub logo: LogoConfig,
}

/// 屏幕硬件配置（Display HAT Mini 的接线）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HatConfig {
    /// SPI 设备节点（SPI0, CE1）
    pub spi_device: PathBuf,
    pub spi_speed_hz: u32,
    /// sysfs GPIO 编号
    pub dc_pin: u64,
    pub backlight_pin: u64,
    /// 红、绿、蓝三色指示灯引脚，低电平点亮
    pub led_pins: [u64; 3],
    /// 背光 PWM 所在的 pwmchip 目录
    pub backlight_pwm_chip: PathBuf,
    pub backlight_pwm_channel: u32,
    pub backlight_pwm_period_ns: u32,
    /// 面板旋转角度，只接受 0/90/180/270
    pub rotation: u16,
    /// 模拟器输出的 PNG 文件
    pub simulator_output: PathBuf,
}

impl Default for HatConfig {
    fn default() -> Self {
        Self {
            spi_device: PathBuf::from("/dev/spidev0.1"),
            spi_speed_hz: 60_000_000,
            dc_pin: 9,
            backlight_pin: 13,
            led_pins: [17, 27, 22],
            backlight_pwm_chip: PathBuf::from("/sys/class/pwm/pwmchip0"),
            backlight_pwm_channel: 1,
            backlight_pwm_period_ns: 1_000_000,
            rotation: 270,
            simulator_output: std::env::temp_dir().join("displayhat-frame.png"),
        }
    }
}

/// 运行时间画面配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UptimeConfig {
    pub source: PathBuf,
    pub title_font: PathBuf,
    pub title_font_size: u32,
    pub detail_font: PathBuf,
    pub detail_font_size: u32,
}

impl Default for UptimeConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("/proc/uptime"),
            title_font: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            title_font_size: 24,
            detail_font: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            detail_font_size: 16,
        }
    }
}

/// Logo画面配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    pub image: PathBuf,
    /// 最后一次提交后保持的毫秒数
    pub dwell_ms: u64,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from("/home/pi/logo.png"),
            dwell_ms: 5_000,
        }
    }
}

impl SplashConfig {
    /// 加载配置
    ///
    /// 依次尝试：
    /// 1. `DISPLAYHAT_CONFIG` 指定的文件（必须存在）
    /// 2. `/etc/displayhat/splash.json`（存在时才读取）
    /// 3. 内置默认值
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// 从JSON文件读取配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// 解析JSON文本
    pub fn from_json(text: &str) -> core::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_board_wiring() {
        let config = SplashConfig::default();
        assert_eq!(config.hat.spi_device, PathBuf::from("/dev/spidev0.1"));
        assert_eq!(config.hat.dc_pin, 9);
        assert_eq!(config.hat.backlight_pin, 13);
        assert_eq!(config.hat.led_pins, [17, 27, 22]);
        assert_eq!(config.uptime.source, PathBuf::from("/proc/uptime"));
        assert_eq!(config.uptime.title_font_size, 24);
        assert_eq!(config.uptime.detail_font_size, 16);
        assert_eq!(config.logo.image, PathBuf::from("/home/pi/logo.png"));
        assert_eq!(config.logo.dwell_ms, 5_000);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = SplashConfig::from_json(
            r#"{ "uptime": { "source": "/tmp/fake-uptime" }, "logo": { "dwell_ms": 10 } }"#,
        )
        .unwrap();

        assert_eq!(config.uptime.source, PathBuf::from("/tmp/fake-uptime"));
        assert_eq!(config.uptime.title_font_size, 24);
        assert_eq!(config.logo.dwell_ms, 10);
        assert_eq!(config.logo.image, PathBuf::from("/home/pi/logo.png"));
        assert_eq!(config.hat, HatConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SplashConfig::from_json("{}").unwrap(), SplashConfig::default());
    }

    #[test]
    fn malformed_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("displayhat-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = SplashConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = SplashConfig::from_file(Path::new("/nonexistent/displayhat.json"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
