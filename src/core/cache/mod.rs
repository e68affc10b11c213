//! # Cache Module
//!
//! Persists a snapshot of the photo inventory so most runs never open the
//! Photos library at all.
//!
//! ## Invalidation
//! A snapshot is rebuilt wholesale (never patched) when:
//! - its schema version differs from [`SCHEMA_VERSION`]
//! - it was built from a different library
//! - the library database's modification time (the fingerprint) has moved
//!
//! A fingerprint that can't be read right now doesn't prove staleness, so it
//! does not invalidate the snapshot.
//!
//! ## Backends
//! - `JsonFileStore` - Single JSON file, replaced by atomic rename
//! - `InMemoryStore` - For testing
//!
//! ## Concurrency
//! Nothing here locks. Overlapping invocations may each rebuild; the rename
//! means a reader sees either the old snapshot or the new one, never a torn
//! file. Callers are expected to run one job at a time.

mod file;
mod memory;
mod traits;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use traits::SnapshotStore;

use crate::core::library::database_path;
use crate::core::record::PhotoRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Increment when `PhotoRecord` or `Snapshot` fields change
pub const SCHEMA_VERSION: u32 = 2;

/// A full, versioned copy of the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema the snapshot was written with
    pub version: u32,
    /// Library the records came from
    pub source_identity: String,
    /// Library database mtime at build time
    pub source_fingerprint: Option<f64>,
    pub records: Vec<PhotoRecord>,
}

impl Snapshot {
    /// Create a snapshot tagged with the current schema version
    pub fn new(
        source_identity: impl Into<String>,
        source_fingerprint: Option<f64>,
        records: Vec<PhotoRecord>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION,
            source_identity: source_identity.into(),
            source_fingerprint,
            records,
        }
    }

    /// Check if this snapshot can be reused given the live fingerprint
    pub fn is_fresh_for(&self, live_fingerprint: Option<f64>) -> bool {
        if self.version != SCHEMA_VERSION {
            return false;
        }
        match live_fingerprint {
            // Can't prove staleness
            None => true,
            Some(live) => self.source_fingerprint == Some(live),
        }
    }
}

/// Live fingerprint of a library: its database's mtime in seconds since the
/// Unix epoch, or `None` if the database can't be stat'ed.
pub fn source_fingerprint(source_identity: &Path) -> Option<f64> {
    let modified = fs::metadata(database_path(source_identity))
        .and_then(|m| m.modified())
        .ok()?;
    modified
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs_f64())
}
