//! # Error Module
//!
//! User-facing error types for photoping.
//!
//! ## Design Principles
//! - **Never panic** on library data - return errors instead
//! - **Include context** - paths, names, what went wrong
//! - **Recovery hints** - suggest how to fix when possible
//!
//! Per-photo problems (a file that can't be stat'ed, a missing place name) are not
//! errors at all; they degrade a single field to `None` where they happen.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PhotopingError {
    #[error("Photos library error: {0}")]
    Library(#[from] LibraryError),

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("Compose error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while reading the Photos library
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Photos library database not found at {path}")]
    NotFound { path: PathBuf },

    #[error(
        "Permission denied opening {path}. Grant this terminal Full Disk Access in \
         System Settings > Privacy & Security > Full Disk Access."
    )]
    PermissionDenied { path: PathBuf },

    #[error("Could not open Photos library at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Photos library query failed: {0}")]
    QueryFailed(String),
}

/// Errors that occur while persisting the snapshot cache
///
/// Never fatal: the inventory logs these and carries on with fresh records.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize cache snapshot: {0}")]
    SerializationFailed(String),
}

/// Errors that stop a photo from being selected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No person named '{person}' found in the library.{}", format_suggestions(.suggestions))]
    PersonNotFound {
        person: String,
        suggestions: Vec<String>,
    },

    #[error("No locally available photos found for {scope}.")]
    NoPhotos { scope: String },

    #[error("All photos for {scope} exceed the {cap_mb} MB size cap.")]
    AllOversized { scope: String, cap_mb: u64 },
}

/// Errors that occur while composing the email
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Photo not found at {path}")]
    PhotoNotFound { path: PathBuf },

    #[error("Nothing to send: no photos were selected")]
    NoEntries,

    #[error("Failed to encode message: {0}")]
    EncodeFailed(String),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Did you mean one of: {}?", suggestions.join(", "))
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PhotopingError>;
