//! 绘图模块
//!
//! 帧缓冲区和文字渲染

pub mod buffer;
pub mod text;

pub use buffer::FrameBuffer;
