//! sysfs PWM 通道（/sys/class/pwm），用于背光调光

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 已导出的 PWM 通道
pub struct SysfsPwm {
    dir: PathBuf,
    period_ns: u32,
}

fn write_attr(path: &Path, value: impl Display) -> io::Result<()> {
    fs::write(path, value.to_string())
}

impl SysfsPwm {
    /// 导出并启用通道，初始占空比为100%
    ///
    /// # 参数
    /// - `chip`: pwmchip 目录，例如 `/sys/class/pwm/pwmchip0`
    /// - `channel`: 通道号
    /// - `period_ns`: 周期（纳秒）
    pub fn open(chip: &Path, channel: u32, period_ns: u32) -> io::Result<Self> {
        if !chip.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not present", chip.display()),
            ));
        }

        let dir = chip.join(format!("pwm{}", channel));
        if !dir.exists() {
            write_attr(&chip.join("export"), channel)?;
            // 等待sysfs节点创建
            for _ in 0..50 {
                if dir.exists() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(2));
            }
        }

        // 占空比不能大于周期，先清零再改周期
        write_attr(&dir.join("duty_cycle"), 0)?;
        write_attr(&dir.join("period"), period_ns)?;
        write_attr(&dir.join("duty_cycle"), period_ns)?;
        write_attr(&dir.join("enable"), 1)?;

        Ok(Self { dir, period_ns })
    }

    /// 按 0.0 - 1.0 设置占空比
    pub fn set_level(&mut self, level: f32) -> io::Result<()> {
        let duty = (self.period_ns as f64 * level as f64).round() as u32;
        write_attr(&self.dir.join("duty_cycle"), duty.min(self.period_ns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_chip(name: &str) -> PathBuf {
        let chip = std::env::temp_dir().join(format!(
            "displayhat-pwm-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(chip.join("pwm1")).unwrap();
        chip
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn open_programs_period_and_enables() {
        let chip = fake_chip("open");
        let _pwm = SysfsPwm::open(&chip, 1, 1_000_000).unwrap();

        assert_eq!(read(chip.join("pwm1/period")), "1000000");
        assert_eq!(read(chip.join("pwm1/duty_cycle")), "1000000");
        assert_eq!(read(chip.join("pwm1/enable")), "1");
        fs::remove_dir_all(&chip).ok();
    }

    #[test]
    fn level_maps_to_duty_cycle() {
        let chip = fake_chip("level");
        let mut pwm = SysfsPwm::open(&chip, 1, 1_000_000).unwrap();

        pwm.set_level(0.5).unwrap();
        assert_eq!(read(chip.join("pwm1/duty_cycle")), "500000");
        pwm.set_level(0.0).unwrap();
        assert_eq!(read(chip.join("pwm1/duty_cycle")), "0");
        fs::remove_dir_all(&chip).ok();
    }

    #[test]
    fn missing_chip_is_an_error() {
        assert!(SysfsPwm::open(Path::new("/nonexistent/pwmchip9"), 1, 1_000_000).is_err());
    }
}
