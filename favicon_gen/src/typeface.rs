use std::{convert::Infallible, sync::Arc};

use embedded_graphics::{
    Drawable, Pixel,
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb888,
    prelude::{Dimensions, DrawTarget, Point, Size},
    primitives::Rectangle,
    text::{Baseline, Text},
};
use font_collector::FontData;
use image::Rgb;
use log::warn;
use rustybuzz::{
    Face, UnicodeBuffer,
    ttf_parser::{GlyphId, OutlineBuilder},
};
use tiny_skia::{PathBuilder, Transform};

use crate::{
    canvas::Canvas,
    color::{to_rgb888, WHITE},
};

/// Ink bounds of a piece of text relative to its pen origin.
///
/// The pen origin is the left end of the baseline and y grows downward, so
/// glyphs that sit on the baseline have a negative `top`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl TextBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A resolved font handle.
pub enum Typeface {
    /// A scalable font rendered at a pixel size.
    Outline(OutlineFace),
    /// The built-in fixed-size font used when no scalable font is available.
    Bitmap(BitmapFace),
}

impl Typeface {
    /// Never fails: without a usable font the bitmap face is returned and the
    /// requested size is ignored.
    pub fn resolve(font: Option<Arc<FontData>>, px_size: f32) -> Self {
        match font.and_then(|font| OutlineFace::new(font, px_size)) {
            Some(face) => Typeface::Outline(face),
            None => Typeface::Bitmap(BitmapFace::default()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Typeface::Bitmap(_))
    }

    pub fn measure(&self, text: &str) -> TextBounds {
        match self {
            Typeface::Outline(face) => face.measure(text),
            Typeface::Bitmap(face) => face.measure(text),
        }
    }

    pub fn draw(&self, canvas: &mut Canvas, text: &str, origin: (f32, f32), color: Rgb<u8>) {
        match self {
            Typeface::Outline(face) => face.draw(canvas, text, origin, color),
            Typeface::Bitmap(face) => face.draw(canvas, text, origin, color),
        }
    }
}

pub struct OutlineFace {
    font: Arc<FontData>,
    px_size: f32,
}

struct PlacedGlyph {
    id: GlyphId,
    // font units, y up
    x: f32,
    y: f32,
}

impl OutlineFace {
    pub fn new(font: Arc<FontData>, px_size: f32) -> Option<Self> {
        if Face::from_slice(&font.binary, font.index).is_none() {
            warn!("font is not parsable. path:{:?}", font.path);
            return None;
        }
        Some(Self { font, px_size })
    }

    pub fn font_name(&self) -> &str {
        &self.font.font_name
    }

    pub fn px_size(&self) -> f32 {
        self.px_size
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::from_slice(&self.font.binary, self.font.index)
    }

    fn scale(&self, face: &Face) -> f32 {
        self.px_size / face.units_per_em() as f32
    }

    fn layout(face: &Face, text: &str) -> Vec<PlacedGlyph> {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        let shaped = rustybuzz::shape(face, &[], buffer);

        let mut pen_x = 0;
        shaped
            .glyph_infos()
            .iter()
            .zip(shaped.glyph_positions())
            .map(|(info, position)| {
                let glyph = PlacedGlyph {
                    id: GlyphId(info.glyph_id as u16),
                    x: (pen_x + position.x_offset) as f32,
                    y: position.y_offset as f32,
                };
                pen_x += position.x_advance;
                glyph
            })
            .collect()
    }

    pub fn measure(&self, text: &str) -> TextBounds {
        let Some(face) = self.face() else {
            return TextBounds::default();
        };
        let scale = self.scale(&face);
        Self::layout(&face, text)
            .iter()
            .filter_map(|glyph| {
                face.glyph_bounding_box(glyph.id).map(|rect| TextBounds {
                    left: (glyph.x + rect.x_min as f32) * scale,
                    top: -(glyph.y + rect.y_max as f32) * scale,
                    right: (glyph.x + rect.x_max as f32) * scale,
                    bottom: -(glyph.y + rect.y_min as f32) * scale,
                })
            })
            .reduce(TextBounds::union)
            .unwrap_or_default()
    }

    pub fn draw(&self, canvas: &mut Canvas, text: &str, origin: (f32, f32), color: Rgb<u8>) {
        let Some(face) = self.face() else {
            return;
        };
        let scale = self.scale(&face);
        for glyph in Self::layout(&face, text) {
            let mut builder = GlyphPathBuilder::default();
            if face.outline_glyph(glyph.id, &mut builder).is_none() {
                continue;
            }
            let Some(path) = builder.builder.finish() else {
                continue;
            };
            let transform = Transform::from_row(
                scale,
                0.0,
                0.0,
                -scale,
                origin.0 + glyph.x * scale,
                origin.1 - glyph.y * scale,
            );
            canvas.fill_path(&path, color, transform);
        }
    }
}

struct GlyphPathBuilder {
    builder: PathBuilder,
}

impl Default for GlyphPathBuilder {
    fn default() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

pub struct BitmapFace {
    font: &'static MonoFont<'static>,
}

impl Default for BitmapFace {
    fn default() -> Self {
        Self { font: &FONT_6X10 }
    }
}

impl BitmapFace {
    fn text<'a>(
        &self,
        text: &'a str,
        origin: Point,
        color: Rgb888,
    ) -> Text<'a, MonoTextStyle<'static, Rgb888>> {
        Text::with_baseline(
            text,
            origin,
            MonoTextStyle::new(self.font, color),
            Baseline::Alphabetic,
        )
    }

    /// Ink bounds of the lit pixels, not of the character cells.
    pub fn measure(&self, text: &str) -> TextBounds {
        let mut probe = InkProbe::default();
        let Ok(_) = self.text(text, Point::zero(), to_rgb888(WHITE)).draw(&mut probe);
        probe.bounds().unwrap_or_default()
    }

    pub fn draw(&self, canvas: &mut Canvas, text: &str, origin: (f32, f32), color: Rgb<u8>) {
        let origin = Point::new(origin.0.round() as i32, origin.1.round() as i32);
        let Ok(_) = self.text(text, origin, to_rgb888(color)).draw(canvas);
    }
}

const PROBE_EXTENT: i32 = 1 << 20;

/// Draw target that only records where pixels land.
#[derive(Default)]
struct InkProbe {
    min: Option<Point>,
    max: Option<Point>,
}

impl InkProbe {
    fn bounds(&self) -> Option<TextBounds> {
        let (min, max) = (self.min?, self.max?);
        Some(TextBounds {
            left: min.x as f32,
            top: min.y as f32,
            right: (max.x + 1) as f32,
            bottom: (max.y + 1) as f32,
        })
    }
}

impl Dimensions for InkProbe {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::new(-PROBE_EXTENT, -PROBE_EXTENT),
            Size::new(2 * PROBE_EXTENT as u32, 2 * PROBE_EXTENT as u32),
        )
    }
}

impl DrawTarget for InkProbe {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, _) in pixels {
            self.min = Some(match self.min {
                Some(min) => Point::new(min.x.min(point.x), min.y.min(point.y)),
                None => point,
            });
            self.max = Some(match self.max {
                Some(max) => Point::new(max.x.max(point.x), max.y.max(point.y)),
                None => point,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use font_collector::FontCollector;

    use super::*;
    use crate::color::BLACK;

    fn installed_font() -> Option<Arc<FontData>> {
        FontCollector::with_default_candidates()
            .load_first()
            .map(Arc::new)
    }

    #[test]
    fn resolve_without_font_is_bitmap() {
        let typeface = Typeface::resolve(None, 358.0);
        assert!(typeface.is_fallback());
    }

    #[test]
    fn resolve_with_broken_font_is_bitmap() {
        let font = Arc::new(FontData {
            font_name: "broken".to_string(),
            path: "broken.ttf".into(),
            binary: b"broken".to_vec(),
            index: 0,
        });
        assert!(Typeface::resolve(Some(font), 32.0).is_fallback());
    }

    #[test]
    fn bitmap_measure_ignores_size() {
        let small = Typeface::resolve(None, 8.0).measure("P");
        let large = Typeface::resolve(None, 512.0).measure("P");
        assert_eq!(small, large);
        assert!(!small.is_empty());
        // ink rises above the baseline
        assert!(small.top < 0.0);
        assert!(small.width() <= 6.0);
    }

    #[test]
    fn bitmap_measure_empty_text() {
        assert!(Typeface::resolve(None, 8.0).measure("").is_empty());
        assert!(Typeface::resolve(None, 8.0).measure("   ").is_empty());
    }

    #[test]
    fn bitmap_draw_lands_on_canvas() {
        let typeface = Typeface::resolve(None, 16.0);
        let mut canvas = Canvas::new(16, 16, BLACK).unwrap();
        typeface.draw(&mut canvas, "P", (4.0, 12.0), WHITE);
        let image = canvas.to_rgb_image();
        assert!(image.pixels().any(|p| *p == WHITE));
    }

    #[test]
    fn outline_measure_scales_with_size() {
        let Some(font) = installed_font() else {
            return;
        };
        let small = Typeface::resolve(Some(font.clone()), 50.0);
        let large = Typeface::resolve(Some(font), 100.0);
        assert!(!small.is_fallback());

        let small = small.measure("P");
        let large = large.measure("P");
        assert!(!small.is_empty());
        assert!((large.width() - small.width() * 2.0).abs() < 0.01);
        assert!((large.height() - small.height() * 2.0).abs() < 0.01);
        assert!(small.top < 0.0);
    }

    #[test]
    fn outline_draw_lands_inside_measured_bounds() {
        let Some(font) = installed_font() else {
            return;
        };
        let typeface = Typeface::resolve(Some(font), 40.0);
        let mut canvas = Canvas::new(64, 64, BLACK).unwrap();
        let origin = (10.0, 50.0);
        typeface.draw(&mut canvas, "P", origin, WHITE);
        let bounds = typeface.measure("P").translate(origin.0, origin.1);

        let image = canvas.to_rgb_image();
        let lit = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != BLACK)
            .collect::<Vec<_>>();
        assert!(!lit.is_empty());
        for (x, y, _) in lit {
            let (x, y) = (x as f32, y as f32);
            assert!(x >= bounds.left.floor() - 1.0 && x <= bounds.right.ceil() + 1.0);
            assert!(y >= bounds.top.floor() - 1.0 && y <= bounds.bottom.ceil() + 1.0);
        }
    }
}
