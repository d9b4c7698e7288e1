//! 探测 Display HAT Mini 是否连接
//!
//! 退出码：0 表示屏幕存在，1 表示不存在或探测出错。

use std::process::ExitCode;

use displayhat_splash::app::detect::{Presence, detect};
use displayhat_splash::common::{SplashConfig, logger};

fn main() -> ExitCode {
    logger::init();

    // 配置错误同样视为探测失败
    let presence = match SplashConfig::load() {
        Ok(config) => detect(&config.hat),
        Err(e) => Presence::Absent(e.to_string()),
    };

    presence.report(&mut std::io::stdout(), &mut std::io::stderr())
}
