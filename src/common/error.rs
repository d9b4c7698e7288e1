// src/common/error.rs
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Display initialization failed: {0}")]
    DisplayInit(String),

    #[error("Display update failed: {0}")]
    DisplayUpdateFailed(String),

    #[error("Backlight control failed: {0}")]
    Backlight(String),

    #[error("LED control failed: {0}")]
    Led(String),

    #[error("Frame buffer is {actual_width}x{actual_height}, display expects {expected_width}x{expected_height}")]
    FrameSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Cannot read uptime source {}: {source}", path.display())]
    UptimeSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed uptime value: {0:?}")]
    UptimeParse(String),

    #[error("Font loading failed for {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("Text rendering failed: {0}")]
    TextRender(String),

    #[error("Cannot load image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = core::result::Result<T, AppError>;
