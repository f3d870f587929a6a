use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use font_collector::{FontCollector, FontData};
use image::Rgb;
use log::{info, warn};

use crate::{
    canvas::Canvas,
    color::{BLACK, SILVER, WHITE},
    compositor::{Anchor, TextRequest, draw_text},
    encoder::{OutputFormat, write_image},
    errors::GenerateError,
    targets::{
        FAVICON_TARGETS, FAVICON_TEXT_RATIO, ImageTarget, OG_IMAGE_TARGET, OG_TAGLINE_PX,
        OG_TAGLINE_TOP, OG_TITLE_PX, OG_TITLE_TOP,
    },
    typeface::Typeface,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    /// Probed before the default candidates, in this order.
    pub fonts: Vec<PathBuf>,
    pub mark: String,
    pub title: String,
    pub tagline: String,
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
    pub tagline_color: Rgb<u8>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public"),
            fonts: Vec::new(),
            mark: "P".to_string(),
            title: "Praxis".to_string(),
            tagline: "Get dressed right.".to_string(),
            background: BLACK,
            foreground: WHITE,
            tagline_color: SILVER,
        }
    }
}

impl GeneratorConfig {
    pub fn font_collector(&self) -> FontCollector {
        let mut collector = FontCollector::with_default_candidates();
        self.fonts
            .iter()
            .rev()
            .for_each(|font| collector.prepend_font_path(font.clone()));
        collector
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

pub struct Generator {
    config: GeneratorConfig,
    font: Option<Arc<FontData>>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let collector = config.font_collector();
        Self::with_font_collector(config, &collector)
    }

    /// Uses `collector` as it is; `config.fonts` is not consulted.
    pub fn with_font_collector(config: GeneratorConfig, collector: &FontCollector) -> Self {
        let font = collector.load_first().map(Arc::new);
        if font.is_none() {
            warn!("no scalable font could be loaded, text is drawn with the built-in bitmap font");
        }
        Self { config, font }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn font_name(&self) -> Option<&str> {
        self.font.as_ref().map(|font| font.font_name.as_str())
    }

    fn typeface(&self, px_size: f32) -> Typeface {
        Typeface::resolve(self.font.clone(), px_size)
    }

    pub fn render_favicon(&self, size: u32) -> Result<Canvas, GenerateError> {
        let mut canvas = Canvas::new(size, size, self.config.background)?;
        let typeface = self.typeface(size as f32 * FAVICON_TEXT_RATIO);
        draw_text(
            &mut canvas,
            &TextRequest {
                text: &self.config.mark,
                typeface: &typeface,
                color: self.config.foreground,
                anchor: Anchor::Center,
            },
        );
        Ok(canvas)
    }

    pub fn render_og_image(&self) -> Result<Canvas, GenerateError> {
        let mut canvas = Canvas::new(
            OG_IMAGE_TARGET.width,
            OG_IMAGE_TARGET.height,
            self.config.background,
        )?;
        let title = self.typeface(OG_TITLE_PX);
        draw_text(
            &mut canvas,
            &TextRequest {
                text: &self.config.title,
                typeface: &title,
                color: self.config.foreground,
                anchor: Anchor::CenterHorizontally { top: OG_TITLE_TOP },
            },
        );
        let tagline = self.typeface(OG_TAGLINE_PX);
        draw_text(
            &mut canvas,
            &TextRequest {
                text: &self.config.tagline,
                typeface: &tagline,
                color: self.config.tagline_color,
                anchor: Anchor::CenterHorizontally {
                    top: OG_TAGLINE_TOP,
                },
            },
        );
        Ok(canvas)
    }

    fn write_target(
        &self,
        target: &ImageTarget,
        canvas: &Canvas,
    ) -> Result<GeneratedImage, GenerateError> {
        let path = self.config.output_dir.join(target.file_name);
        write_image(canvas, &path, target.format)?;
        Ok(GeneratedImage {
            path,
            width: canvas.width(),
            height: canvas.height(),
            format: target.format,
        })
    }

    /// Writes every favicon and the OG image, stopping at the first failure.
    /// `on_created` is called once per written file.
    pub fn generate_all<F>(&self, mut on_created: F) -> Result<Vec<GeneratedImage>, GenerateError>
    where
        F: FnMut(&GeneratedImage),
    {
        create_output_dir(&self.config.output_dir)?;
        info!(
            "generation started. output_dir:{:?}, font:{:?}",
            self.config.output_dir,
            self.font_name()
        );

        let mut generated = Vec::with_capacity(FAVICON_TARGETS.len() + 1);
        for target in FAVICON_TARGETS.iter() {
            let canvas = self.render_favicon(target.width)?;
            let image = self.write_target(target, &canvas)?;
            on_created(&image);
            generated.push(image);
        }
        let canvas = self.render_og_image()?;
        let image = self.write_target(&OG_IMAGE_TARGET, &canvas)?;
        on_created(&image);
        generated.push(image);

        info!("generation finished. files:{}", generated.len());
        Ok(generated)
    }
}

fn create_output_dir(dir: &Path) -> Result<(), GenerateError> {
    std::fs::create_dir_all(dir).map_err(|source| GenerateError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
