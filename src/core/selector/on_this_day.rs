//! "On this day" anniversary selection.

use super::{normalize_person, within_size_cap, PersonIndex};
use crate::core::record::PhotoRecord;
use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Select a photo taken on `today`'s month and day in an earlier year.
///
/// Photos without a parseable date and photos over the size cap are skipped.
/// With a `person`, photos of that person are preferred outright: if any
/// exist the pick comes only from them, otherwise from every anniversary
/// photo. The name is matched like [`select_photo`] does but not validated;
/// an unknown name simply falls through to the whole pool.
///
/// Returns `None` when nothing matches today, which is the normal case for
/// many days of the year.
///
/// [`select_photo`]: super::select_photo
pub fn select_on_this_day<'a, R: Rng + ?Sized>(
    records: &'a [PhotoRecord],
    person: Option<&str>,
    today: NaiveDate,
    rng: &mut R,
) -> Option<&'a PhotoRecord> {
    let pool: Vec<&PhotoRecord> = records
        .iter()
        .filter(|r| {
            r.parsed_date().is_some_and(|date| {
                date.month() == today.month()
                    && date.day() == today.day()
                    && date.year() < today.year()
            })
        })
        .filter(|r| within_size_cap(r))
        .collect();

    if pool.is_empty() {
        debug!(%today, "No on-this-day photos");
        return None;
    }

    if let Some(person) = normalize_person(person) {
        let index = PersonIndex::build(records);
        if let Some(canonical) = index.resolve(person) {
            let tagged: Vec<&PhotoRecord> = pool
                .iter()
                .copied()
                .filter(|r| r.has_person(canonical))
                .collect();
            if !tagged.is_empty() {
                debug!(
                    candidates = tagged.len(),
                    person = canonical,
                    "On-this-day photos of person"
                );
                return tagged.choose(rng).copied();
            }
        }
        debug!(person, "No on-this-day photos of person; using all");
    }

    pool.choose(rng).copied()
}
