//! 开机Logo画面

use displayhat_splash::app::logo;
use displayhat_splash::common::{SplashConfig, logger};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();
    info!("Logo splash starting");

    let config = SplashConfig::load()?;
    logo::run(&config)?;
    Ok(())
}
