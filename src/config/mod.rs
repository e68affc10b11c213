//! # Config Module
//!
//! Runtime settings, resolved as command-line flag > environment (`.env` is
//! loaded into the environment at startup) > built-in default.
//!
//! ## Environment
//! - `PHOTOS_LIBRARY` - path to the `.photoslibrary` bundle
//! - `PHOTOPING_CACHE` - path to the snapshot cache file
//! - `PERSON_NAME` - default person filter (blank = whole library)
//! - `EMAIL_SUBJECT` - subject override
//! - `SENDER_EMAIL`, `SENDER_NAME`, `RECIPIENT_EMAIL` - message addressing

use crate::core::cache::JsonFileStore;
use crate::core::library::PhotosLibrary;
use crate::error::{PhotopingError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Load `.env` from the working directory, if there is one.
///
/// Runs before logging is set up, so the caller logs the returned path.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific env file. Variables already set are not overridden.
pub fn load_dotenv_from(path: &Path) -> Result<()> {
    dotenvy::from_path(path)
        .map_err(|e| PhotopingError::Config(format!("Could not load {}: {}", path.display(), e)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub library_path: PathBuf,
    pub cache_path: PathBuf,
    pub person: Option<String>,
    pub email_subject: Option<String>,
}

impl Settings {
    /// Resolve settings from flags and the process environment
    pub fn resolve(
        library: Option<PathBuf>,
        cache: Option<PathBuf>,
        person: Option<String>,
    ) -> Self {
        Self::resolve_with(library, cache, person, |key| env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the environment
    pub fn resolve_with<F>(
        library: Option<PathBuf>,
        cache: Option<PathBuf>,
        person: Option<String>,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let library_path = library
            .or_else(|| non_blank(lookup("PHOTOS_LIBRARY")).map(PathBuf::from))
            .unwrap_or_else(PhotosLibrary::default_path);
        let cache_path = cache
            .or_else(|| non_blank(lookup("PHOTOPING_CACHE")).map(PathBuf::from))
            .unwrap_or_else(JsonFileStore::default_path);

        Self {
            library_path,
            cache_path,
            person: non_blank(person).or_else(|| non_blank(lookup("PERSON_NAME"))),
            email_subject: non_blank(lookup("EMAIL_SUBJECT")),
        }
    }
}

/// Message addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub sender_email: String,
    pub sender_name: Option<String>,
    pub recipients: Vec<String>,
}

impl MailSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # Errors
    /// `Config` when `SENDER_EMAIL` or `RECIPIENT_EMAIL` is missing or blank
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            non_blank(lookup(key)).ok_or_else(|| {
                PhotopingError::Config(format!("{} is not set. Add it to your .env file.", key))
            })
        };

        let sender_email = require("SENDER_EMAIL")?;
        let recipients = parse_recipients(&require("RECIPIENT_EMAIL")?);
        if recipients.is_empty() {
            return Err(PhotopingError::Config(
                "RECIPIENT_EMAIL has no addresses. Add it to your .env file.".to_string(),
            ));
        }

        Ok(Self {
            sender_email,
            sender_name: non_blank(lookup("SENDER_NAME")),
            recipients,
        })
    }

    /// `Name <email>` when a sender name is configured, else the bare address
    pub fn sender_formatted(&self) -> String {
        match &self.sender_name {
            Some(name) => format!("{} <{}>", name, self.sender_email),
            None => self.sender_email.clone(),
        }
    }
}

/// Split a comma-separated address list, dropping blanks
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
