//! # Inventory Module
//!
//! Decides whether the cached snapshot can answer a request or the library
//! has to be read again.
//!
//! ## Flow
//! 1. Unless forced, load the snapshot and check it against the live
//!    fingerprint. A fresh snapshot is returned without touching the library.
//! 2. Otherwise enumerate the library, map every usable photo to a
//!    `PhotoRecord`, save the new snapshot and return its records.
//!
//! ## Example
//! ```rust,ignore
//! let inventory = PhotoInventory::new(PhotosLibrary::new(path), JsonFileStore::new(cache));
//! let records = inventory.get_records(false)?;
//! ```

use crate::core::cache::{source_fingerprint, Snapshot, SnapshotStore};
use crate::core::library::PhotoLibrary;
use crate::core::record::PhotoRecord;
use crate::error::LibraryError;
use tracing::{debug, info, warn};

/// Cached view over a photo library
pub struct PhotoInventory<L, S> {
    library: L,
    store: S,
}

impl<L: PhotoLibrary, S: SnapshotStore> PhotoInventory<L, S> {
    pub fn new(library: L, store: S) -> Self {
        Self { library, store }
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Identity the snapshot is keyed by
    fn source_identity(&self) -> String {
        self.library.library_path().to_string_lossy().into_owned()
    }

    /// Return every cached photo record, rebuilding the cache when it is
    /// missing, stale, or `force_refresh` is set.
    ///
    /// # Errors
    /// Only when the library itself can't be read. Cache problems are treated
    /// as a miss; a failed save is logged and the fresh records still returned.
    pub fn get_records(&self, force_refresh: bool) -> Result<Vec<PhotoRecord>, LibraryError> {
        if !force_refresh {
            if let Some(snapshot) = self.load_fresh() {
                debug!(records = snapshot.records.len(), "Using cached photo records");
                return Ok(snapshot.records);
            }
        }

        let snapshot = self.rebuild()?;
        Ok(snapshot.records)
    }

    fn load_fresh(&self) -> Option<Snapshot> {
        let snapshot = self.store.load()?;

        if snapshot.source_identity != self.source_identity() {
            debug!(
                cached = %snapshot.source_identity,
                "Cache was built from a different library"
            );
            return None;
        }

        let live = source_fingerprint(self.library.library_path());
        if snapshot.is_fresh_for(live) {
            Some(snapshot)
        } else {
            debug!(
                cached = ?snapshot.source_fingerprint,
                live = ?live,
                "Photos library changed since cache was built"
            );
            None
        }
    }

    fn rebuild(&self) -> Result<Snapshot, LibraryError> {
        info!("Building photo cache (this runs once, then stays fast)...");

        // Read before listing: a change made mid-listing shows up as drift next run
        let fingerprint = source_fingerprint(self.library.library_path());

        let photos = self.library.photos()?;
        let total = photos.len();
        let records: Vec<PhotoRecord> = photos
            .into_iter()
            .filter_map(PhotoRecord::from_library)
            .collect();

        let snapshot = Snapshot::new(self.source_identity(), fingerprint, records);

        if let Err(e) = self.store.save(&snapshot) {
            warn!(error = %e, "Could not save photo cache; it will be rebuilt next run");
        }

        info!(
            cached = snapshot.records.len(),
            skipped = total - snapshot.records.len(),
            "Cached {} local photos.",
            snapshot.records.len()
        );
        Ok(snapshot)
    }
}
