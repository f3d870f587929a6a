use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::codecs::{jpeg::JpegEncoder, png::PngEncoder};
use log::info;

use crate::{canvas::Canvas, errors::GenerateError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }
}

/// Encodes `canvas` to `path`, creating missing parent directories.
/// An existing file is overwritten.
pub fn write_image(canvas: &Canvas, path: &Path, format: OutputFormat) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| GenerateError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let image = canvas.to_rgb_image();
    let result = match format {
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut writer)),
        OutputFormat::Jpeg { quality } => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
        }
    };
    result.map_err(|source| GenerateError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| GenerateError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "image written. path:{:?}, size:{}x{}, format:{:?}",
        path,
        canvas.width(),
        canvas.height(),
        format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, ImageReader};

    use super::*;
    use crate::color::{BLACK, WHITE};

    fn decoded(path: &Path) -> (Option<ImageFormat>, (u32, u32)) {
        let reader = ImageReader::open(path)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        let format = reader.format();
        let image = reader.decode().unwrap();
        (format, (image.width(), image.height()))
    }

    #[test]
    fn png_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/public/icon.png");
        let canvas = Canvas::new(32, 32, BLACK).unwrap();

        write_image(&canvas, &path, OutputFormat::Png).unwrap();
        assert_eq!(decoded(&path), (Some(ImageFormat::Png), (32, 32)));
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("og.jpg");
        let canvas = Canvas::new(120, 63, WHITE).unwrap();

        write_image(&canvas, &path, OutputFormat::Jpeg { quality: 90 }).unwrap();
        assert_eq!(decoded(&path), (Some(ImageFormat::Jpeg), (120, 63)));
    }

    #[test]
    fn png_pixels_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        let canvas = Canvas::new(8, 8, WHITE).unwrap();

        write_image(&canvas, &path, OutputFormat::Png).unwrap();
        let image = image::open(&path).unwrap().to_rgb8();
        assert!(image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"stale").unwrap();
        let canvas = Canvas::new(16, 16, BLACK).unwrap();

        write_image(&canvas, &path, OutputFormat::Png).unwrap();
        assert_eq!(decoded(&path), (Some(ImageFormat::Png), (16, 16)));
    }

    #[test]
    fn directory_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("public");
        std::fs::write(&blocker, b"").unwrap();
        let canvas = Canvas::new(16, 16, BLACK).unwrap();

        let result = write_image(&canvas, &blocker.join("icon.png"), OutputFormat::Png);
        assert!(matches!(result, Err(GenerateError::CreateDir { .. })));
    }
}
