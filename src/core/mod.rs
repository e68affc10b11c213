//! # Core Module
//!
//! The photo selection engine, independent of the CLI.
//!
//! ## Modules
//! - `library` - Reads photos from the Photos library
//! - `record` - The cached per-photo record
//! - `cache` - Persists snapshots of the records
//! - `inventory` - Serves records from the cache, rebuilding when stale
//! - `selector` - Random and on-this-day selection
//! - `compose` - Renders selected photos into an email message

pub mod cache;
pub mod compose;
pub mod inventory;
pub mod library;
pub mod record;
pub mod selector;

// Re-export commonly used types
pub use cache::{JsonFileStore, Snapshot, SnapshotStore};
pub use compose::{EmailMessage, PhotoEntry};
pub use inventory::PhotoInventory;
pub use library::{LibraryPhoto, PhotoLibrary, PhotosLibrary};
pub use record::PhotoRecord;
pub use selector::{select_on_this_day, select_photo, Selection};
