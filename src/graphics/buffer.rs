//! 帧缓冲区管理（RGB888，每像素3字节）

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use image::RgbImage;

/// 帧缓冲区
///
/// 尺寸在创建时固定，提交到屏幕时必须与面板分辨率一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    /// 创建全黑的帧缓冲区
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 按行优先顺序返回全部像素
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// 读取像素，越界返回 None
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// 设置像素，越界静默忽略
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// 按覆盖率（0-255）把颜色混合到现有像素上
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb888, coverage: u8) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let mix = |fg: u8, bg: u8| -> u8 {
            let a = coverage as u16;
            ((fg as u16 * a + bg as u16 * (255 - a) + 127) / 255) as u8
        };
        let bg = self.pixels[i];
        self.pixels[i] = Rgb888::new(
            mix(color.r(), bg.r()),
            mix(color.g(), bg.g()),
            mix(color.b(), bg.b()),
        );
    }

    /// 将图片粘贴到指定位置，超出部分裁掉
    pub fn paste(&mut self, image: &RgbImage, x: i32, y: i32) {
        for (px, py, p) in image.enumerate_pixels() {
            self.set_pixel(
                x + px as i32,
                y + py as i32,
                Rgb888::new(p[0], p[1], p[2]),
            );
        }
    }

    /// 转换为 image 库的 RGB 图片（模拟器保存PNG用）
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixels[y as usize * self.width as usize + x as usize];
            image::Rgb([c.r(), c.g(), c.b()])
        })
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::{Point, Primitive};
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_graphics::Drawable;

    #[test]
    fn new_buffer_is_black_and_sized() {
        let buffer = FrameBuffer::new(320, 240);
        assert_eq!(buffer.size(), Size::new(320, 240));
        assert_eq!(buffer.pixels().len(), 320 * 240);
        assert!(buffer.pixels().iter().all(|&p| p == Rgb888::BLACK));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buffer = FrameBuffer::new(4, 4);
        buffer.set_pixel(-1, 0, Rgb888::WHITE);
        buffer.set_pixel(4, 0, Rgb888::WHITE);
        buffer.set_pixel(0, 4, Rgb888::WHITE);
        assert!(buffer.pixels().iter().all(|&p| p == Rgb888::BLACK));
        assert_eq!(buffer.pixel(4, 0), None);
    }

    #[test]
    fn draws_embedded_graphics_primitives() {
        let mut buffer = FrameBuffer::new(10, 10);
        Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::GREEN))
            .draw(&mut buffer)
            .unwrap();

        assert_eq!(buffer.pixel(2, 2), Some(Rgb888::GREEN));
        assert_eq!(buffer.pixel(4, 4), Some(Rgb888::GREEN));
        assert_eq!(buffer.pixel(5, 5), Some(Rgb888::BLACK));
    }

    #[test]
    fn blend_interpolates_towards_foreground() {
        let mut buffer = FrameBuffer::new(1, 1);
        buffer.blend_pixel(0, 0, Rgb888::WHITE, 255);
        assert_eq!(buffer.pixel(0, 0), Some(Rgb888::WHITE));

        let mut buffer = FrameBuffer::new(1, 1);
        buffer.blend_pixel(0, 0, Rgb888::WHITE, 0);
        assert_eq!(buffer.pixel(0, 0), Some(Rgb888::BLACK));

        let mut buffer = FrameBuffer::new(1, 1);
        buffer.blend_pixel(0, 0, Rgb888::new(200, 100, 0), 128);
        assert_eq!(buffer.pixel(0, 0), Some(Rgb888::new(100, 50, 0)));
    }

    #[test]
    fn paste_clips_to_buffer() {
        let mut buffer = FrameBuffer::new(4, 4);
        let image = RgbImage::from_pixel(3, 3, image::Rgb([1, 2, 3]));
        buffer.paste(&image, 2, 2);

        assert_eq!(buffer.pixel(2, 2), Some(Rgb888::new(1, 2, 3)));
        assert_eq!(buffer.pixel(3, 3), Some(Rgb888::new(1, 2, 3)));
        assert_eq!(buffer.pixel(1, 1), Some(Rgb888::BLACK));
    }

    #[test]
    fn rgb_image_export_keeps_pixels() {
        let mut buffer = FrameBuffer::new(3, 2);
        buffer.set_pixel(2, 1, Rgb888::new(9, 8, 7));
        let image = buffer.to_rgb_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [9, 8, 7]);
    }
}
