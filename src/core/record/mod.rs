//! # Record Module
//!
//! The cached shape of a photo. Everything downstream of the library adapter
//! (cache, selector, composer) works on [`PhotoRecord`] only.

use crate::core::library::LibraryPhoto;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;

/// Date format used for `PhotoRecord::date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lightweight snapshot of a photo's metadata at cache-build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Absolute path to the image file on local storage
    pub path: String,
    /// Display name
    pub original_filename: String,
    /// Capture date as `YYYY-MM-DD`
    pub date: Option<String>,
    /// Tagged persons, in library order
    #[serde(default)]
    pub persons: Vec<String>,
    pub title: Option<String>,
    /// File size; `None` when the file couldn't be stat'ed
    pub size_bytes: Option<u64>,
    /// Place name
    pub location: Option<String>,
}

impl PhotoRecord {
    /// Map a library item into a record.
    ///
    /// Returns `None` for items that should never be cached: no local file, or
    /// flagged as a screenshot / screen recording. The file size is probed here;
    /// a failed probe leaves `size_bytes` empty instead of failing.
    pub fn from_library(photo: LibraryPhoto) -> Option<Self> {
        if photo.is_screenshot || photo.is_screen_recording {
            return None;
        }
        let path = photo.path?;

        let size_bytes = fs::metadata(&path).ok().map(|m| m.len());

        Some(Self {
            path: path.to_string_lossy().into_owned(),
            original_filename: photo.original_filename,
            date: photo.date.map(|d| d.format(DATE_FORMAT).to_string()),
            persons: photo.persons,
            title: photo.title.filter(|t| !t.is_empty()),
            size_bytes,
            location: photo.place_name,
        })
    }

    /// Parse `date`, if present and well-formed
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
    }

    /// Check whether `name` is tagged on this photo (exact match)
    pub fn has_person(&self, name: &str) -> bool {
        self.persons.iter().any(|p| p == name)
    }

    /// File size in megabytes, for display
    pub fn size_mb(&self) -> Option<f64> {
        self.size_bytes.map(|b| b as f64 / (1024.0 * 1024.0))
    }
}
