use embedded_graphics::pixelcolor::Rgb888;
use image::Rgb;

use crate::errors::GenerateError;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// `#cccccc`, used for secondary text.
pub const SILVER: Rgb<u8> = Rgb([0xcc, 0xcc, 0xcc]);

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>, GenerateError> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(GenerateError::InvalidColor(value.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| GenerateError::InvalidColor(value.to_string()))
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

pub(crate) fn to_skia(color: Rgb<u8>) -> tiny_skia::Color {
    let Rgb([r, g, b]) = color;
    tiny_skia::Color::from_rgba8(r, g, b, 255)
}

pub(crate) fn to_rgb888(color: Rgb<u8>) -> Rgb888 {
    let Rgb([r, g, b]) = color;
    Rgb888::new(r, g, b)
}
