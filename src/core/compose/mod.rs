//! # Compose Module
//!
//! Turns selected photos into an email message: subject, HTML body with
//! inline images, plain-text fallback. Delivery is someone else's job; the
//! message lists the files to attach and the content ids the HTML refers to.
//!
//! ## Layout
//! - Intro line describing the photo (and the memory, if there is one)
//! - One block per photo: optional label, inline image, date/location caption
//! - A divider between blocks

mod html;

pub use html::{caption_html, intro_html, label_html};

use crate::core::record::{PhotoRecord, DATE_FORMAT};
use crate::error::ComposeError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Subject used when nothing else applies
pub const DEFAULT_SUBJECT: &str = "A photo for you";

/// One photo as it appears in the email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoEntry {
    pub path: PathBuf,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub location: Option<String>,
    /// Heading shown above the photo, e.g. "On this day, 5 years ago"
    pub label: Option<String>,
}

impl PhotoEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_record(record: &PhotoRecord) -> Self {
        Self {
            path: PathBuf::from(&record.path),
            date: record.date.clone(),
            location: record.location.clone(),
            label: None,
        }
    }

    /// Entry for an anniversary photo, labelled with how long ago it was taken
    pub fn memory(record: &PhotoRecord, today: NaiveDate) -> Self {
        Self {
            label: Some(match record.date.as_deref() {
                Some(date) => years_ago_label(date, today),
                None => "On this day".to_string(),
            }),
            ..Self::from_record(record)
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Formatted date and location, in that order, skipping missing ones
    pub fn caption_parts(&self) -> Vec<String> {
        format_date(self.date.as_deref())
            .into_iter()
            .chain(self.location.clone())
            .collect()
    }
}

/// An inline image referenced from the HTML body as `cid:<content_id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineImage {
    pub path: PathBuf,
    pub content_id: String,
    pub mime_type: &'static str,
}

/// A fully composed message, ready for a mail transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub inline_images: Vec<InlineImage>,
}

/// Convert `YYYY-MM-DD` to `Month D, YYYY` (e.g. `March 5, 2019`).
///
/// Unparseable input is returned unchanged.
pub fn format_date(date: Option<&str>) -> Option<String> {
    let date = date.filter(|d| !d.is_empty())?;
    Some(match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    })
}

/// Label like `On this day, 5 years ago`; plain `On this day` when the date
/// can't be parsed.
pub fn years_ago_label(date: &str, today: NaiveDate) -> String {
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(parsed) => {
            let years = today.year() - parsed.year();
            let unit = if years == 1 { "year" } else { "years" };
            format!("On this day, {} {} ago", years, unit)
        }
        Err(_) => "On this day".to_string(),
    }
}

/// Subject line: an explicit override wins, otherwise mention the memory's year
pub fn subject_line(subject_override: Option<&str>, memory: Option<&PhotoRecord>) -> String {
    if let Some(subject) = subject_override.map(str::trim).filter(|s| !s.is_empty()) {
        return subject.to_string();
    }
    match memory.and_then(PhotoRecord::parsed_date) {
        Some(date) => format!("{} + a memory from {}", DEFAULT_SUBJECT, date.year()),
        None => DEFAULT_SUBJECT.to_string(),
    }
}

/// Guess an image MIME type from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Compose the message for `entries`.
///
/// # Errors
/// `NoEntries` for an empty list, `PhotoNotFound` if any photo file is missing.
pub fn build_message(
    sender: &str,
    recipients: &[String],
    entries: &[PhotoEntry],
    subject: &str,
) -> Result<EmailMessage, ComposeError> {
    if entries.is_empty() {
        return Err(ComposeError::NoEntries);
    }
    if let Some(missing) = entries.iter().find(|e| !e.path.exists()) {
        return Err(ComposeError::PhotoNotFound {
            path: missing.path.clone(),
        });
    }

    let inline_images = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| InlineImage {
            path: entry.path.clone(),
            content_id: format!("photo_{}", i),
            mime_type: mime_type_for(&entry.path),
        })
        .collect();

    Ok(EmailMessage {
        from: sender.to_string(),
        to: recipients.to_vec(),
        subject: subject.to_string(),
        text_body: plain_text(entries),
        html_body: html::body_html(entries),
        inline_images,
    })
}

fn plain_text(entries: &[PhotoEntry]) -> String {
    let mut text = String::from("A photo for you.");
    for entry in entries {
        let parts = entry.caption_parts();
        if entry.label.is_none() && parts.is_empty() {
            continue;
        }
        text.push('\n');
        if let Some(label) = &entry.label {
            text.push('\n');
            text.push_str(label);
        }
        if !parts.is_empty() {
            text.push('\n');
            text.push_str(&parts.join(" · "));
        }
    }
    text
}
