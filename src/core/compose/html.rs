//! HTML fragments for the message body.

use super::{format_date, PhotoEntry};
use crate::core::record::DATE_FORMAT;
use chrono::{Datelike, NaiveDate};

/// Minimal escaping for text placed in element content or attribute values
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Date/location line under a photo; empty when there's neither
pub fn caption_html(entry: &PhotoEntry) -> String {
    let parts = entry.caption_parts();
    if parts.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = parts.iter().map(|p| escape(p)).collect();
    format!(
        r#"<p style="margin: 12px 0 0; color: #888; font-size: 13px; text-align: center;">{}</p>"#,
        parts.join(" &nbsp;·&nbsp; ")
    )
}

/// Heading above a photo
pub fn label_html(label: &str) -> String {
    format!(
        r#"<p style="margin: 0 0 12px; color: #555; font-size: 14px; font-weight: bold; text-align: center;">{}</p>"#,
        escape(label)
    )
}

/// Opening sentence describing the first photo, plus the memory if present
pub fn intro_html(entries: &[PhotoEntry]) -> String {
    let first = entries.first();
    let date = first.and_then(|e| format_date(e.date.as_deref()));
    let location = first.and_then(|e| e.location.as_deref());

    let mut sentence = match (date, location) {
        (Some(date), Some(location)) => {
            format!("Here's a photo from {} in {}", escape(&date), escape(location))
        }
        (Some(date), None) => format!("Here's a photo from {}", escape(&date)),
        (None, Some(location)) => format!("Here's a photo from {}", escape(location)),
        (None, None) => "Here's a photo from your library".to_string(),
    };

    if let Some(memory) = entries.get(1) {
        let year = memory
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
            .map(|d| d.year());
        match year {
            Some(year) => sentence.push_str(&format!(", plus a memory from {}", year)),
            None => sentence.push_str(", plus a memory from this day"),
        }
    }
    sentence.push('.');

    format!(
        r#"<p style="margin: 0 0 20px; color: #333; font-size: 15px; text-align: center;">{}</p>"#,
        sentence
    )
}

fn photo_block(index: usize, entry: &PhotoEntry) -> String {
    let mut block = String::new();
    if index > 0 {
        block.push_str(
            r#"<div style="border-top: 1px solid #ddd; margin: 32px 0;"></div>"#,
        );
    }
    if let Some(label) = &entry.label {
        block.push_str(&label_html(label));
    }
    let alt = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    block.push_str(&format!(
        r#"<img src="cid:photo_{}" style="max-width: 100%; border-radius: 8px; display: block;" alt="{}">"#,
        index,
        escape(&alt)
    ));
    block.push_str(&caption_html(entry));
    block
}

/// Full HTML document for the message
pub(super) fn body_html(entries: &[PhotoEntry]) -> String {
    let blocks: String = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| photo_block(i, entry))
        .collect();

    format!(
        r#"<html>
  <body style="font-family: sans-serif; background: #f5f5f5; padding: 24px; margin: 0;">
    <div style="max-width: 600px; margin: 0 auto;">
      {}
      {}
    </div>
  </body>
</html>
"#,
        intro_html(entries),
        blocks
    )
}
