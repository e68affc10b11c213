//! # Library Module
//!
//! The boundary to the real photo source.
//!
//! The rest of the crate never sees the source's object model: an adapter
//! hands back plain [`LibraryPhoto`] values and [`PhotoRecord::from_library`]
//! turns them into cacheable records.
//!
//! ## Backends
//! - `PhotosLibrary` - Reads an Apple Photos library's `Photos.sqlite`
//!
//! [`PhotoRecord::from_library`]: crate::core::record::PhotoRecord::from_library

mod photos_db;

pub use photos_db::PhotosLibrary;

use crate::error::LibraryError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// One photo as reported by the library, before caching
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryPhoto {
    /// Local file, or `None` when the original isn't on disk (e.g. cloud-only)
    pub path: Option<PathBuf>,
    pub original_filename: String,
    pub date: Option<NaiveDate>,
    pub persons: Vec<String>,
    pub title: Option<String>,
    pub place_name: Option<String>,
    pub is_screenshot: bool,
    pub is_screen_recording: bool,
}

/// Trait for photo sources
pub trait PhotoLibrary {
    /// Root of the library; doubles as the cache's source identity
    fn library_path(&self) -> &Path;

    /// Enumerate every photo in the library.
    ///
    /// Fails only when the library can't be reached at all; per-photo gaps are
    /// reported as `None` fields.
    fn photos(&self) -> Result<Vec<LibraryPhoto>, LibraryError>;
}

/// Location of the library database whose mtime fingerprints the library
pub fn database_path(library_path: &Path) -> PathBuf {
    library_path.join("database").join("Photos.sqlite")
}
