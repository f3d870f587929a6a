use anyhow::Context;
use clap::Parser;
use favicon_gen::{Args, Generator, GeneratorConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("favicon_gen", log::LevelFilter::Info)
        .filter_module("font_collector", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let list_fonts = args.list_fonts;
    let config = GeneratorConfig::try_from(args)?;

    if list_fonts {
        config
            .font_collector()
            .list_font_names()
            .iter()
            .for_each(|name| println!("{}", name));
        return Ok(());
    }

    let generator = Generator::new(config);
    generator
        .generate_all(|image| {
            println!(
                "Created {} ({}x{})",
                image.path.display(),
                image.width,
                image.height
            )
        })
        .context("favicon generation failed")?;

    println!("\nAll favicon files generated!");
    println!(
        "Note: You'll need to create favicon.ico separately (use an online converter from favicon-32x32.png)"
    );
    Ok(())
}
