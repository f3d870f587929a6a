pub mod convert_text;

use std::path::{Path, PathBuf};

use convert_text::{NameId, PreferredLanguage};
use log::{debug, info};
use rustybuzz::Face;
use thiserror::Error;

/// Candidates probed when the caller does not supply any font.
/// Bare file names are searched in the system font directories.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "arial.ttf",
    "Arial.ttf",
    "DejaVuSans-Bold.ttf",
    "LiberationSans-Bold.ttf",
];

#[derive(Debug, Clone)]
pub struct FontData {
    pub font_name: String,
    pub path: PathBuf,
    pub binary: Vec<u8>,
    pub index: u32,
}

#[derive(Error, Debug)]
pub enum FontLoadError {
    #[error("font file not found. path:{0:?}")]
    NotFound(PathBuf),
    #[error("font file could not be read. path:{path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font data has no parsable face. path:{0:?}")]
    UnparsableFace(PathBuf),
}

pub struct FontCollector {
    font_paths: Vec<PathBuf>,
    preffered_language: Option<PreferredLanguage>,
}

impl Default for FontCollector {
    fn default() -> Self {
        Self {
            font_paths: Vec::new(),
            preffered_language: Some(PreferredLanguage::UnitedStates),
        }
    }
}

impl FontCollector {
    pub fn with_default_candidates() -> Self {
        let mut collector = Self::default();
        collector.add_system_fonts();
        collector
    }

    pub fn add_system_fonts(&mut self) {
        DEFAULT_FONT_CANDIDATES
            .iter()
            .for_each(|candidate| self.add_font_path(PathBuf::from(candidate)));
    }

    pub fn add_font_path(&mut self, path: PathBuf) {
        self.font_paths.push(path);
    }

    /// Inserts `path` ahead of every candidate registered so far.
    pub fn prepend_font_path(&mut self, path: PathBuf) {
        self.font_paths.insert(0, path);
    }

    pub fn font_paths(&self) -> &[PathBuf] {
        &self.font_paths
    }

    /// Resolves a candidate to a font file on disk.
    ///
    /// Existing paths are used as they are. A bare file name such as
    /// `arial.ttf` that is not present in the working directory is looked up
    /// recursively in the system font directories.
    pub fn locate(&self, candidate: &Path) -> Option<PathBuf> {
        if candidate.is_file() {
            return Some(candidate.to_path_buf());
        }
        if candidate.components().count() != 1 {
            return None;
        }
        let file_name = candidate.to_str()?;
        system_font_dirs()
            .iter()
            .filter(|dir| dir.is_dir())
            .find_map(|dir| find_in_dir(dir, file_name))
    }

    pub fn load_font_file(&self, path: &Path) -> Result<FontData, FontLoadError> {
        let Some(located) = self.locate(path) else {
            return Err(FontLoadError::NotFound(path.to_path_buf()));
        };
        let binary = std::fs::read(&located).map_err(|source| FontLoadError::Io {
            path: located.clone(),
            source,
        })?;
        // the first face of a collection, as other font loaders do by default
        let index = 0;
        let Some(face) = Face::from_slice(&binary, index) else {
            return Err(FontLoadError::UnparsableFace(located));
        };
        let font_name =
            convert_text::get_font_name(&face.names(), NameId::FullFontName, self.preffered_language)
                .or_else(|| {
                    located
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                })
                .unwrap_or_default();
        Ok(FontData {
            font_name,
            path: located,
            binary,
            index,
        })
    }

    /// Probes the candidates in order and returns the first loadable font.
    pub fn load_first(&self) -> Option<FontData> {
        let font = self
            .font_paths
            .iter()
            .find_map(|candidate| match self.load_font_file(candidate) {
                Ok(font) => Some(font),
                Err(e) => {
                    debug!("skip font candidate. reason:{}", e);
                    None
                }
            });
        match &font {
            Some(font) => info!("font_path:{:?}, name:{:?}", font.path, font.font_name),
            None => info!("no scalable font found. candidates:{:?}", self.font_paths),
        }
        font
    }

    pub fn list_font_names(&self) -> Vec<String> {
        let mut font_names = self
            .font_paths
            .iter()
            .filter_map(|candidate| self.locate(candidate))
            .filter_map(|path| std::fs::read(path).ok())
            .flat_map(|data| convert_text::font_name(&data, self.preffered_language))
            .collect::<Vec<String>>();
        font_names.sort();
        font_names.dedup();
        font_names
    }
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = if cfg!(target_os = "windows") {
        vec![PathBuf::from("C:\\Windows\\Fonts")]
    } else if cfg!(target_os = "macos") {
        vec![
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
        ]
    } else {
        vec![
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
        ]
    };
    if let Some(user_dir) = dirs::font_dir() {
        dirs.push(user_dir);
    }
    dirs
}

fn find_in_dir(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let pattern = format!(
        "{}/**/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(file_name)
    );
    let found = glob::glob(&pattern)
        .ok()?
        .filter_map(Result::ok)
        .find(|path| path.is_file());
    if let Some(path) = &found {
        debug!("font file located. name:{}, path:{:?}", file_name, path);
    }
    found
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    /// Returns some scalable font installed on this machine, if any.
    fn installed_font() -> Option<FontData> {
        FontCollector::with_default_candidates().load_first()
    }

    #[test]
    fn default_candidates_keep_order() {
        let collector = FontCollector::with_default_candidates();
        let paths = collector
            .font_paths()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(paths, DEFAULT_FONT_CANDIDATES);
    }

    #[test]
    fn prepend_goes_first() {
        let mut collector = FontCollector::with_default_candidates();
        collector.prepend_font_path(PathBuf::from("custom.ttf"));
        assert_eq!(collector.font_paths()[0], PathBuf::from("custom.ttf"));
        assert_eq!(
            collector.font_paths().len(),
            DEFAULT_FONT_CANDIDATES.len() + 1
        );
    }

    #[test]
    fn missing_candidates_yield_none() {
        let mut collector = FontCollector::default();
        collector.add_font_path(PathBuf::from("/no/such/dir/font.ttf"));
        collector.add_font_path(PathBuf::from("no-such-font-5f1e.ttf"));
        assert!(collector.load_first().is_none());
    }

    #[test]
    fn missing_file_is_not_found() {
        let collector = FontCollector::default();
        let result = collector.load_font_file(Path::new("/no/such/dir/font.ttf"));
        assert!(matches!(result, Err(FontLoadError::NotFound(_))));
    }

    #[test]
    fn garbage_file_is_unparsable() {
        let mut file = tempfile::Builder::new().suffix(".ttf").tempfile().unwrap();
        file.write_all(b"definitely not a font").unwrap();

        let collector = FontCollector::default();
        let result = collector.load_font_file(file.path());
        assert!(matches!(result, Err(FontLoadError::UnparsableFace(_))));
    }

    #[test]
    fn garbage_candidate_is_skipped() {
        let mut file = tempfile::Builder::new().suffix(".ttf").tempfile().unwrap();
        file.write_all(b"definitely not a font").unwrap();

        let mut collector = FontCollector::default();
        collector.add_font_path(file.path().to_path_buf());
        assert!(collector.load_first().is_none());
    }

    #[test]
    fn installed_font_is_loaded_first() {
        // Nothing to check on machines without any of the candidates.
        let Some(font) = installed_font() else {
            return;
        };
        assert!(!font.binary.is_empty());
        assert!(!font.font_name.is_empty());

        let mut collector = FontCollector::default();
        collector.add_font_path(PathBuf::from("/no/such/dir/font.ttf"));
        collector.add_font_path(font.path.clone());
        let loaded = collector.load_first().unwrap();
        assert_eq!(loaded.path, font.path);
    }
}
