//! In-memory snapshot store for testing.

use super::{Snapshot, SnapshotStore, SCHEMA_VERSION};
use crate::error::CacheError;
use std::cell::{Cell, RefCell};

/// In-memory snapshot store
///
/// Counts saves so tests can assert whether a rebuild was persisted.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: RefCell<Option<Snapshot>>,
    saves: Cell<usize>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `snapshot`
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot)),
            saves: Cell::new(0),
        }
    }

    /// The currently stored snapshot, regardless of version
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.borrow().clone()
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> Option<Snapshot> {
        self.snapshot
            .borrow()
            .as_ref()
            .filter(|s| s.version == SCHEMA_VERSION)
            .cloned()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
