//! JSON file snapshot store.

use super::{Snapshot, SnapshotStore, SCHEMA_VERSION};
use crate::error::CacheError;
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Cache file name used next to the executable
pub const CACHE_FILE_NAME: &str = ".photos_cache.json";

/// Snapshot persisted as a single JSON file
///
/// Saves go to a temporary file in the same directory which is then renamed
/// over the cache file, so the previous snapshot stays intact until the new
/// one is complete.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store the snapshot at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default cache location: beside the running executable
    pub fn default_path() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_failed(&self, source: std::io::Error) -> CacheError {
        CacheError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Option<Snapshot> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %e, "Cache file unreadable");
                }
                return None;
            }
        };

        let snapshot: Snapshot = match serde_json::from_reader(BufReader::new(file)) {
            Ok(s) => s,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Ignoring corrupt cache file");
                return None;
            }
        };

        if snapshot.version != SCHEMA_VERSION {
            debug!(
                found = snapshot.version,
                expected = SCHEMA_VERSION,
                "Ignoring cache written with another schema version"
            );
            return None;
        }

        Some(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
        self.write_atomically(|writer| {
            serde_json::to_writer(writer, snapshot)
                .map_err(|e| CacheError::SerializationFailed(e.to_string()))
        })?;

        debug!(path = %self.path.display(), records = snapshot.records.len(), "Saved cache");
        Ok(())
    }
}

impl JsonFileStore {
    /// Run `write` against a temp file beside the cache file, then rename it
    /// into place. On any error the temp file is discarded and the existing
    /// cache file is left as it was.
    fn write_atomically<F>(&self, write: F) -> Result<(), CacheError>
    where
        F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), CacheError>,
    {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.write_failed(e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_failed(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            write(&mut writer)?;
            writer.flush().map_err(|e| self.write_failed(e))?;
        }

        temp.persist(&self.path).map_err(|e| self.write_failed(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::PhotoRecord;
    use tempfile::TempDir;

    fn record(name: &str, size: Option<u64>) -> PhotoRecord {
        PhotoRecord {
            path: format!("/photos/{}", name),
            original_filename: name.to_string(),
            date: Some("2019-02-20".to_string()),
            persons: vec!["Alice Smith".to_string(), "Bob Jones".to_string()],
            title: None,
            size_bytes: size,
            location: Some("New York, NY".to_string()),
        }
    }

    #[test]
    fn save_then_load_preserves_records_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("cache.json"));
        let records = vec![
            record("c.jpg", Some(3)),
            record("a.jpg", None),
            record("b.jpg", Some(1)),
        ];
        let snapshot = Snapshot::new("/lib", Some(1_700_000_000.123456), records.clone());

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.records, records);
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn load_returns_none_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("missing.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn load_returns_none_when_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(JsonFileStore::new(path).load().is_none());
    }

    #[test]
    fn load_returns_none_on_version_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("cache.json"));
        let mut snapshot = Snapshot::new("/lib", Some(1.0), vec![record("a.jpg", None)]);
        snapshot.version = 1;
        store.save(&snapshot).unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("cache.json"));

        store
            .save(&Snapshot::new("/lib", Some(1.0), vec![record("old.jpg", None)]))
            .unwrap();
        store
            .save(&Snapshot::new("/lib", Some(2.0), vec![record("new.jpg", None)]))
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.source_fingerprint, Some(2.0));
        assert_eq!(loaded.records[0].original_filename, "new.jpg");

        // Only the cache file is left behind, no temp files
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("cache.json"));
        let first = Snapshot::new("/lib", Some(1.0), vec![record("first.jpg", Some(1))]);
        store.save(&first).unwrap();

        let result = store.write_atomically(|writer| {
            writer.write_all(b"{\"version\": 2, \"records\": [").unwrap();
            writer.flush().unwrap();
            Err(CacheError::SerializationFailed("disk full".to_string()))
        });

        assert!(matches!(result, Err(CacheError::SerializationFailed(_))));
        assert_eq!(store.load().unwrap(), first);
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_over_directory_fails_without_touching_it() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        fs::create_dir(&path).unwrap();
        let store = JsonFileStore::new(&path);

        let result = store.save(&Snapshot::new("/lib", None, vec![record("a.jpg", None)]));

        assert!(matches!(result, Err(CacheError::WriteFailed { .. })));
        assert!(path.is_dir());
        assert!(store.load().is_none());
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("cache.json");
        let store = JsonFileStore::new(&path);

        store.save(&Snapshot::new("/lib", None, vec![])).unwrap();

        assert!(path.exists());
    }
}
