//! End-to-end: library -> cache -> selection -> composed message

mod common;

use chrono::NaiveDate;
use common::FixtureLibrary;
use photoping::core::compose::{build_message, subject_line};
use photoping::core::selector::person_counts;
use photoping::core::{
    select_on_this_day, select_photo, JsonFileStore, PhotoEntry, PhotoInventory, PhotosLibrary,
};
use photoping::error::SelectionError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

const MB: usize = 1024 * 1024;

fn build_library(temp: &TempDir) -> FixtureLibrary {
    let library = FixtureLibrary::create(&temp.path().join("Photos.photoslibrary"));
    library.add_photo(1, "alice_2018.jpg", (2018, 2, 20), 4 * MB);
    library.add_photo(2, "alice_2024.jpg", (2024, 6, 1), 2 * MB);
    library.add_photo(3, "bob_2018.jpg", (2018, 2, 20), 3 * MB);
    library.add_photo(4, "huge_2019.jpg", (2019, 2, 20), 25 * MB);
    library.add_photo(5, "today.jpg", (2026, 2, 20), MB);
    library.tag(1, 1, "Alice Smith");
    library.tag(2, 1, "Alice Smith");
    library.tag(3, 2, "Bob Jones");
    library.tag(4, 1, "Alice Smith");
    library
}

fn load(temp: &TempDir, library: &FixtureLibrary) -> Vec<photoping::core::PhotoRecord> {
    PhotoInventory::new(
        PhotosLibrary::new(&library.root),
        JsonFileStore::new(temp.path().join(".photos_cache.json")),
    )
    .get_records(false)
    .unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
}

#[test]
fn test_person_selection_is_case_insensitive_and_respects_size_cap() {
    let temp = TempDir::new().unwrap();
    let library = build_library(&temp);
    let records = load(&temp, &library);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let selection = select_photo(&records, Some("alice smith"), &mut rng).unwrap();
        assert!(selection.photo.has_person("Alice Smith"));
        assert_ne!(selection.photo.original_filename, "huge_2019.jpg");
        assert_eq!(selection.eligible, 2);
        assert_eq!(selection.skipped_oversized, 1);
    }
}

#[test]
fn test_unknown_person_suggests_partial_matches() {
    let temp = TempDir::new().unwrap();
    let library = build_library(&temp);
    let records = load(&temp, &library);
    let mut rng = StdRng::seed_from_u64(7);

    let error = select_photo(&records, Some("alice"), &mut rng).unwrap_err();

    assert_eq!(
        error,
        SelectionError::PersonNotFound {
            person: "alice".to_string(),
            suggestions: vec!["Alice Smith".to_string()],
        }
    );
}

#[test]
fn test_on_this_day_prefers_person_and_skips_current_year() {
    let temp = TempDir::new().unwrap();
    let library = build_library(&temp);
    let records = load(&temp, &library);
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let memory = select_on_this_day(&records, Some("Alice Smith"), today(), &mut rng).unwrap();
        // bob_2018 shares the date but isn't tagged; huge_2019 is over the cap
        assert_eq!(memory.original_filename, "alice_2018.jpg");
    }

    for _ in 0..50 {
        let memory = select_on_this_day(&records, None, today(), &mut rng).unwrap();
        assert_ne!(memory.original_filename, "today.jpg");
        assert_ne!(memory.original_filename, "huge_2019.jpg");
    }

    let other_day = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
    assert!(select_on_this_day(&records, None, other_day, &mut rng).is_none());
}

#[test]
fn test_person_counts_from_library() {
    let temp = TempDir::new().unwrap();
    let library = build_library(&temp);
    let records = load(&temp, &library);

    assert_eq!(
        person_counts(&records),
        vec![("Alice Smith".to_string(), 3), ("Bob Jones".to_string(), 1)]
    );
}

#[test]
fn test_composed_message_references_both_photos() {
    let temp = TempDir::new().unwrap();
    let library = build_library(&temp);
    let records = load(&temp, &library);
    let mut rng = StdRng::seed_from_u64(3);

    let selection = select_photo(&records, Some("Bob Jones"), &mut rng).unwrap();
    let memory = select_on_this_day(&records, Some("Alice Smith"), today(), &mut rng);

    let mut entries = vec![PhotoEntry::from_record(selection.photo)];
    entries.extend(memory.map(|m| PhotoEntry::memory(m, today())));
    let subject = subject_line(None, memory);

    let message = build_message(
        "Photo Bot <bot@example.com>",
        &["family@example.com".to_string()],
        &entries,
        &subject,
    )
    .unwrap();

    assert_eq!(message.subject, "A photo for you + a memory from 2018");
    assert_eq!(message.inline_images.len(), 2);
    assert!(message.inline_images[0].path.ends_with("bob_2018.jpg"));
    assert!(message.html_body.contains("cid:photo_0"));
    assert!(message.html_body.contains("cid:photo_1"));
    assert!(message.html_body.contains("On this day, 8 years ago"));
    assert!(message.html_body.contains("February 20, 2018"));
}
