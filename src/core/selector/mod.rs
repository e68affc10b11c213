//! # Selector Module
//!
//! Picks photos out of the cached records.
//!
//! ## Queries
//! - [`select_photo`] - uniform random pick, optionally limited to one person
//! - [`select_on_this_day`] - a photo taken on today's month/day in an earlier year
//!
//! Both drop anything over [`MAX_PHOTO_SIZE_BYTES`] before picking, so an
//! oversized photo can never be returned. A photo with an unknown size is
//! always eligible.
//!
//! Randomness is injected: pass `rand::thread_rng()` in the application and a
//! seeded `StdRng` in tests.

mod on_this_day;

pub use on_this_day::select_on_this_day;

use crate::core::record::PhotoRecord;
use crate::error::SelectionError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::info;

/// Size cap in megabytes
pub const MAX_PHOTO_SIZE_MB: u64 = 20;

/// Size cap in bytes
pub const MAX_PHOTO_SIZE_BYTES: u64 = MAX_PHOTO_SIZE_MB * 1024 * 1024;

/// Check the size cap; unknown sizes pass
pub fn within_size_cap(record: &PhotoRecord) -> bool {
    record
        .size_bytes
        .map_or(true, |size| size <= MAX_PHOTO_SIZE_BYTES)
}

/// Case-insensitive index of the person names present in the records
///
/// Each lowercase name maps to the first spelling seen.
#[derive(Debug, Default)]
pub struct PersonIndex<'a> {
    by_lowercase: HashMap<String, &'a str>,
    /// Canonical names in first-seen order
    canonical: Vec<&'a str>,
}

impl<'a> PersonIndex<'a> {
    pub fn build(records: &'a [PhotoRecord]) -> Self {
        let mut index = Self::default();
        for name in records.iter().flat_map(|r| r.persons.iter()) {
            let key = name.to_lowercase();
            if !index.by_lowercase.contains_key(&key) {
                index.by_lowercase.insert(key, name.as_str());
                index.canonical.push(name.as_str());
            }
        }
        index
    }

    /// Canonical spelling for `name`, matched case-insensitively
    pub fn resolve(&self, name: &str) -> Option<&'a str> {
        self.by_lowercase.get(&name.to_lowercase()).copied()
    }

    /// Every canonical name containing `name` (case-insensitive)
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let needle = name.to_lowercase();
        self.canonical
            .iter()
            .filter(|n| n.to_lowercase().contains(&needle))
            .map(|n| n.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Outcome of a successful [`select_photo`]
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub photo: &'a PhotoRecord,
    /// Size of the pool the photo was drawn from
    pub eligible: usize,
    /// Photos for this filter dropped by the size cap
    pub skipped_oversized: usize,
    /// Human-readable filter description, e.g. `'Alice Smith'` or `entire library`
    pub scope: String,
}

/// Blank person names mean "no filter"
pub(crate) fn normalize_person(person: Option<&str>) -> Option<&str> {
    person.map(str::trim).filter(|p| !p.is_empty())
}

/// Select a random photo, optionally limited to photos of `person`.
///
/// # Errors
/// - `PersonNotFound` when no tagged name matches `person`, with every name
///   containing it as suggestions
/// - `NoPhotos` when the filter leaves nothing
/// - `AllOversized` when everything left is over the size cap
pub fn select_photo<'a, R: Rng + ?Sized>(
    records: &'a [PhotoRecord],
    person: Option<&str>,
    rng: &mut R,
) -> Result<Selection<'a>, SelectionError> {
    let (pool, scope): (Vec<&PhotoRecord>, String) = match normalize_person(person) {
        Some(person) => {
            let index = PersonIndex::build(records);
            let canonical = index
                .resolve(person)
                .ok_or_else(|| SelectionError::PersonNotFound {
                    person: person.to_string(),
                    suggestions: index.suggestions(person),
                })?;
            let pool = records.iter().filter(|r| r.has_person(canonical)).collect();
            (pool, format!("'{}'", canonical))
        }
        None => (records.iter().collect(), "entire library".to_string()),
    };

    if pool.is_empty() {
        return Err(SelectionError::NoPhotos { scope });
    }

    let sized_pool: Vec<&PhotoRecord> = pool
        .iter()
        .copied()
        .filter(|r| within_size_cap(r))
        .collect();
    if sized_pool.is_empty() {
        return Err(SelectionError::AllOversized {
            scope,
            cap_mb: MAX_PHOTO_SIZE_MB,
        });
    }

    let skipped_oversized = pool.len() - sized_pool.len();
    if skipped_oversized > 0 {
        info!(
            "Skipped {} photo(s) over {} MB.",
            skipped_oversized, MAX_PHOTO_SIZE_MB
        );
    }

    let photo = sized_pool
        .choose(rng)
        .copied()
        .ok_or_else(|| SelectionError::NoPhotos {
            scope: scope.clone(),
        })?;

    info!(
        "Selected 1 of {} eligible photos from {}.",
        sized_pool.len(),
        scope
    );

    Ok(Selection {
        photo,
        eligible: sized_pool.len(),
        skipped_oversized,
        scope,
    })
}

/// Named persons with their photo counts, sorted case-insensitively by name
pub fn person_counts(records: &[PhotoRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in records.iter().flat_map(|r| r.persons.iter()) {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| {
        a.0.to_lowercase()
            .cmp(&b.0.to_lowercase())
            .then_with(|| a.0.cmp(&b.0))
    });
    counts
}
