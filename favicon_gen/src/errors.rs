use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("canvas size is invalid. width:{0}, height:{1}")]
    InvalidCanvasSize(u32, u32),
    #[error("output directory could not be created. path:{path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output file could not be created. path:{path:?}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output file could not be written. path:{path:?}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image encoding failed. path:{path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid color. value:{0}")]
    InvalidColor(String),
}
