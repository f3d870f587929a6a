use crate::encoder::OutputFormat;

/// One output file of a generation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTarget {
    pub file_name: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl ImageTarget {
    const fn square_png(file_name: &'static str, size: u32) -> Self {
        Self {
            file_name,
            width: size,
            height: size,
            format: OutputFormat::Png,
        }
    }
}

pub const FAVICON_TARGETS: [ImageTarget; 5] = [
    ImageTarget::square_png("favicon-16x16.png", 16),
    ImageTarget::square_png("favicon-32x32.png", 32),
    ImageTarget::square_png("apple-touch-icon.png", 180),
    ImageTarget::square_png("android-chrome-192x192.png", 192),
    ImageTarget::square_png("android-chrome-512x512.png", 512),
];

pub const OG_IMAGE_TARGET: ImageTarget = ImageTarget {
    file_name: "og-image.jpg",
    width: 1200,
    height: 630,
    format: OutputFormat::Jpeg { quality: 90 },
};

/// Favicon text height relative to the icon side.
pub const FAVICON_TEXT_RATIO: f32 = 0.7;

pub const OG_TITLE_PX: f32 = 120.0;
pub const OG_TITLE_TOP: f32 = 200.0;
pub const OG_TAGLINE_PX: f32 = 32.0;
pub const OG_TAGLINE_TOP: f32 = 350.0;
