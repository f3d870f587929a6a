use image::Rgb;

use crate::{
    canvas::Canvas,
    typeface::{TextBounds, Typeface},
};

/// Where the ink box of a text goes on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Centered on both axes.
    Center,
    /// Centered horizontally with the top of the ink at `top`.
    CenterHorizontally { top: f32 },
}

pub struct TextRequest<'a> {
    pub text: &'a str,
    pub typeface: &'a Typeface,
    pub color: Rgb<u8>,
    pub anchor: Anchor,
}

/// Pen origin that puts the ink box `bounds` at `anchor`.
pub fn place(canvas_size: (u32, u32), bounds: &TextBounds, anchor: Anchor) -> (f32, f32) {
    let (width, height) = (canvas_size.0 as f32, canvas_size.1 as f32);
    let x = ((width - bounds.width()) / 2.0).floor() - bounds.left;
    let y = match anchor {
        Anchor::Center => ((height - bounds.height()) / 2.0).floor() - bounds.top,
        Anchor::CenterHorizontally { top } => top - bounds.top,
    };
    (x, y)
}

/// Draws the request and returns the ink box in canvas coordinates.
pub fn draw_text(canvas: &mut Canvas, request: &TextRequest) -> TextBounds {
    let bounds = request.typeface.measure(request.text);
    let origin = place((canvas.width(), canvas.height()), &bounds, request.anchor);
    request
        .typeface
        .draw(canvas, request.text, origin, request.color);
    bounds.translate(origin.0, origin.1)
}
