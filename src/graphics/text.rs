//! 文字渲染（基于freetype-rs，加载失败时退回内置点阵字体）

use std::path::Path;

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use freetype::face::{Face, LoadFlag};
use freetype::library::Library;
use log::{debug, warn};

use super::buffer::FrameBuffer;
use crate::common::error::{AppError, Result};

/// 内置的后备字体
pub const FALLBACK_FONT: &MonoFont<'static> = &FONT_6X10;

/// 单个字号的字体
pub enum SplashFont {
    /// TrueType 字体，按像素字号渲染（抗锯齿）
    TrueType { face: Face, pixel_size: u32 },
    /// 内置点阵字体
    Builtin(&'static MonoFont<'static>),
}

impl SplashFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, SplashFont::Builtin(_))
    }

    /// 以 `center` 为中心绘制单行文本（水平、垂直均居中）
    pub fn draw_centered(
        &mut self,
        buffer: &mut FrameBuffer,
        text: &str,
        center: Point,
        color: Rgb888,
    ) -> Result<()> {
        match self {
            SplashFont::TrueType { face, pixel_size } => {
                draw_truetype_centered(buffer, face, *pixel_size, text, center, color)
            }
            SplashFont::Builtin(font) => {
                let style = MonoTextStyle::new(*font, color);
                let text_style = TextStyleBuilder::new()
                    .alignment(Alignment::Center)
                    .baseline(Baseline::Middle)
                    .build();
                Text::with_text_style(text, center, style, text_style)
                    .draw(buffer)
                    .ok();
                Ok(())
            }
        }
    }
}

/// 标题与正文两个字号
///
/// 字段按声明顺序释放，face 必须先于 library 释放。
pub struct SplashFonts {
    pub title: SplashFont,
    pub detail: SplashFont,
    _library: Option<Library>,
}

impl SplashFonts {
    /// 两个字号都使用内置字体
    pub fn builtin() -> Self {
        Self {
            title: SplashFont::Builtin(FALLBACK_FONT),
            detail: SplashFont::Builtin(FALLBACK_FONT),
            _library: None,
        }
    }

    /// 加载两个 TrueType 字体，任意一个失败即返回错误
    pub fn load_truetype(
        title_path: &Path,
        title_size: u32,
        detail_path: &Path,
        detail_size: u32,
    ) -> Result<Self> {
        let library = Library::init().map_err(|e| AppError::Font {
            path: title_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let title = open_face(&library, title_path, title_size)?;
        let detail = open_face(&library, detail_path, detail_size)?;

        Ok(Self {
            title: SplashFont::TrueType {
                face: title,
                pixel_size: title_size,
            },
            detail: SplashFont::TrueType {
                face: detail,
                pixel_size: detail_size,
            },
            _library: Some(library),
        })
    }
}

/// 加载字体，失败时两个字号一起退回内置字体
pub fn load_fonts(
    title_path: &Path,
    title_size: u32,
    detail_path: &Path,
    detail_size: u32,
) -> SplashFonts {
    match SplashFonts::load_truetype(title_path, title_size, detail_path, detail_size) {
        Ok(fonts) => {
            debug!(
                "Loaded fonts {} ({}px) and {} ({}px)",
                title_path.display(),
                title_size,
                detail_path.display(),
                detail_size
            );
            fonts
        }
        Err(e) => {
            warn!("{}, using built-in font", e);
            SplashFonts::builtin()
        }
    }
}

fn open_face(library: &Library, path: &Path, pixel_size: u32) -> Result<Face> {
    let font_error = |e: freetype::Error| AppError::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let face = library.new_face(path.as_os_str(), 0).map_err(font_error)?;
    face.set_pixel_sizes(0, pixel_size).map_err(font_error)?;
    Ok(face)
}

fn draw_truetype_centered(
    buffer: &mut FrameBuffer,
    face: &mut Face,
    pixel_size: u32,
    text: &str,
    center: Point,
    color: Rgb888,
) -> Result<()> {
    let render_error = |e: freetype::Error| AppError::TextRender(e.to_string());

    face.set_pixel_sizes(0, pixel_size).map_err(render_error)?;

    // 先量出整行的前进宽度
    let mut width = 0i32;
    for c in text.chars() {
        face.load_char(c as usize, LoadFlag::DEFAULT)
            .map_err(render_error)?;
        width += (face.glyph().advance().x >> 6) as i32;
    }

    let metrics = face
        .size_metrics()
        .ok_or_else(|| AppError::TextRender("face has no size metrics".into()))?;
    let ascender = (metrics.ascender >> 6) as i32;
    let descender = (metrics.descender >> 6) as i32;

    // 中线位于 ascender 与 descender 的正中
    let baseline = center.y + (ascender + descender) / 2;
    let mut pen_x = center.x - width / 2;

    for c in text.chars() {
        face.load_char(c as usize, LoadFlag::RENDER)
            .map_err(render_error)?;
        let glyph = face.glyph();
        let bitmap = glyph.bitmap();
        let rows = bitmap.rows();
        let cols = bitmap.width();
        let pitch = bitmap.pitch();
        let data = bitmap.buffer();

        let left = pen_x + glyph.bitmap_left();
        let top = baseline - glyph.bitmap_top();

        for row in 0..rows {
            for col in 0..cols {
                let coverage = data[(row * pitch + col) as usize];
                if coverage > 0 {
                    buffer.blend_pixel(left + col, top + row, color, coverage);
                }
            }
        }

        pen_x += (glyph.advance().x >> 6) as i32;
    }

    Ok(())
}
