use std::path::PathBuf;

use clap::Parser;

use crate::{color::parse_hex_color, errors::GenerateError, generator::GeneratorConfig};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "favicon and OG image generator", long_about = None)]
pub struct Args {
    /// directory the images are written to
    #[arg(short, long, default_value = "public")]
    pub output_dir: PathBuf,
    /// font file tried before the built-in candidates (repeatable)
    #[arg(short, long)]
    pub font: Vec<PathBuf>,
    /// text of the favicons
    #[arg(short, long, default_value = "P")]
    pub mark: String,
    #[arg(short, long, default_value = "Praxis")]
    pub title: String,
    #[arg(long, default_value = "Get dressed right.")]
    pub tagline: String,
    #[arg(long, default_value = "#000000")]
    pub background: String,
    #[arg(long, default_value = "#ffffff")]
    pub foreground: String,
    #[arg(long, default_value = "#cccccc")]
    pub tagline_color: String,
    /// print the names of the fonts the candidates resolve to and exit
    #[arg(long)]
    pub list_fonts: bool,
}

impl TryFrom<Args> for GeneratorConfig {
    type Error = GenerateError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Ok(GeneratorConfig {
            output_dir: args.output_dir,
            fonts: args.font,
            mark: args.mark,
            title: args.title,
            tagline: args.tagline,
            background: parse_hex_color(&args.background)?,
            foreground: parse_hex_color(&args.foreground)?,
            tagline_color: parse_hex_color(&args.tagline_color)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_is_default_config() {
        let args = Args::parse_from(["favicon_gen"]);
        assert!(!args.list_fonts);
        let config = GeneratorConfig::try_from(args).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn fonts_keep_order() {
        let args = Args::parse_from([
            "favicon_gen",
            "--font",
            "a.ttf",
            "-f",
            "b.otf",
            "--output-dir",
            "dist",
        ]);
        let config = GeneratorConfig::try_from(args).unwrap();
        assert_eq!(config.fonts, vec![PathBuf::from("a.ttf"), PathBuf::from("b.otf")]);
        assert_eq!(config.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn bad_color_is_rejected() {
        let args = Args::parse_from(["favicon_gen", "--background", "black"]);
        assert!(matches!(
            GeneratorConfig::try_from(args),
            Err(GenerateError::InvalidColor(_))
        ));
    }
}
