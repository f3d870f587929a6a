mod args;
pub mod canvas;
pub mod color;
pub mod compositor;
pub mod encoder;
pub mod errors;
pub mod generator;
pub mod targets;
pub mod typeface;

pub use crate::args::Args;
pub use crate::errors::GenerateError;
pub use crate::generator::{GeneratedImage, Generator, GeneratorConfig};
