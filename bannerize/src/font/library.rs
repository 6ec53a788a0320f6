//! Named banner fonts stored as `<name>.txt` files in a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use super::FontTable;

/// The banners shipped alongside the renderer.
pub const DEFAULT_BANNERS: [&str; 4] = ["apple", "shadow", "standard", "thinkertoy"];

/// A directory of banner fonts and the names that may be loaded from it
///
/// ```
/// # use bannerize::font::BannerLibrary;
/// let library = BannerLibrary::new("assets/banners").with_names(["standard"]);
/// assert!(library.contains("standard"));
/// assert!(!library.contains("shadow"));
/// assert_eq!(
///     library.path("standard"),
///     std::path::Path::new("assets/banners/standard.txt")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerLibrary {
    dir: PathBuf,
    names: Vec<String>,
}

impl Default for BannerLibrary {
    fn default() -> Self {
        Self::new("banners")
    }
}

impl BannerLibrary {
    /// A library rooted at `dir` that allows the [`DEFAULT_BANNERS`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: DEFAULT_BANNERS.map(str::to_owned).to_vec(),
        }
    }

    /// Replaces the allowed banner names.
    #[must_use]
    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// The directory banners are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The banner names that may be loaded.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if `name` is one of the allowed banners.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }

    /// The file a banner is stored in.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.txt"))
    }

    /// Reads and decodes the banner called `name`.
    ///
    /// Non-fatal issues with the font are logged as warnings.
    ///
    /// # Errors
    /// Returns `Err` if the name is not allowed or the file cannot be read; see
    /// [`FontLoadError`].
    pub fn load(&self, name: &str) -> Result<FontTable, FontLoadError> {
        if !self.contains(name) {
            return Err(FontLoadError::UnknownBanner(name.to_owned()));
        }
        let path = self.path(name);
        let bytes = fs::read(&path).map_err(|source| FontLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let (font, warnings) = FontTable::from_bytes_with_warnings(bytes);
        for warning in &warnings {
            warn!("banner {name}: {warning}");
        }
        debug!("loaded banner {name} from {} ({} lines)", path.display(), font.len());
        Ok(font)
    }
}

/// An error in loading a banner font
#[derive(Debug, Error)]
pub enum FontLoadError {
    /// The requested banner is not in the library.
    #[error(r#"unknown banner "{0}""#)]
    UnknownBanner(String),
    /// The banner file is missing or unreadable.
    #[error("cannot read banner file {}: {source}", .path.display())]
    Io {
        /// The file that was read
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
}
