use std::convert::Infallible;

use embedded_graphics::{
    Pixel,
    pixelcolor::Rgb888,
    prelude::{DrawTarget, OriginDimensions, RgbColor, Size},
};
use image::{Rgb, RgbImage};
use tiny_skia::{FillRule, Paint, Path, Pixmap, PremultipliedColorU8, Transform};

use crate::{color::to_skia, errors::GenerateError};

/// An opaque RGB raster that text is drawn onto.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Result<Self, GenerateError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(GenerateError::InvalidCanvasSize(width, height))?;
        pixmap.fill(to_skia(background));
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgb([c.red(), c.green(), c.blue()])
        })
    }

    /// Fills `path` with anti-aliasing, non-zero winding.
    pub fn fill_path(&mut self, path: &Path, color: Rgb<u8>, transform: Transform) {
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, transform, None);
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let (width, height) = (self.width(), self.height());
        RgbImage::from_fn(width, height, |x, y| {
            self.pixel(x, y).unwrap_or(Rgb([0, 0, 0]))
        })
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let index = y as usize * self.width() as usize + x as usize;
        if let Some(pixel) = PremultipliedColorU8::from_rgba(color.r(), color.g(), color.b(), 255) {
            self.pixmap.pixels_mut()[index] = pixel;
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}
