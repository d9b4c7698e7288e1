//! 在屏幕上显示一次开机运行时间

use displayhat_splash::app::uptime;
use displayhat_splash::common::{SplashConfig, logger};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();
    info!("Uptime splash starting");

    let config = SplashConfig::load()?;
    let reading = uptime::run(&config)?;

    println!("{}", reading.confirmation());
    Ok(())
}
