//! Snapshot store trait definition.

use super::Snapshot;
use crate::error::CacheError;

/// Trait for snapshot persistence
pub trait SnapshotStore {
    /// Read the persisted snapshot.
    ///
    /// Fails soft: a missing file, unreadable content or a schema version
    /// other than the current one all come back as `None`.
    fn load(&self) -> Option<Snapshot>;

    /// Replace the persisted snapshot
    ///
    /// A failed save must leave any previously saved snapshot readable.
    fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError>;
}
