//! Apple Photos library backend.
//!
//! Reads `database/Photos.sqlite` directly, read-only. Only the handful of
//! tables needed for a `LibraryPhoto` are touched:
//! - `ZASSET` / `ZADDITIONALASSETATTRIBUTES` - files, dates, titles, kind
//! - `ZDETECTEDFACE` / `ZPERSON` - named people
//! - `ZMOMENT` - place names
//!
//! Persons and places are optional extras: if their queries fail the photos
//! are still returned, just without that information.

use super::{database_path, LibraryPhoto, PhotoLibrary};
use crate::error::LibraryError;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Seconds between the Unix epoch and the Core Data epoch (2001-01-01 UTC)
const CORE_DATA_EPOCH_OFFSET: i64 = 978_307_200;

/// `ZKINDSUBTYPE` values
const SUBTYPE_SCREENSHOT: i64 = 10;
const SUBTYPE_SCREEN_RECORDING: i64 = 103;

const ASSETS_QUERY: &str = "SELECT a.Z_PK, a.ZDIRECTORY, a.ZFILENAME, a.ZDATECREATED,
        a.ZKINDSUBTYPE, aa.ZORIGINALFILENAME, aa.ZTITLE
     FROM ZASSET a
     LEFT JOIN ZADDITIONALASSETATTRIBUTES aa ON aa.ZASSET = a.Z_PK
     WHERE a.ZTRASHEDSTATE = 0
     ORDER BY a.Z_PK";

const PERSONS_QUERY: &str = "SELECT f.ZASSETFORFACE, p.ZFULLNAME
     FROM ZDETECTEDFACE f
     JOIN ZPERSON p ON p.Z_PK = f.ZPERSONFORFACE
     WHERE p.ZFULLNAME IS NOT NULL AND p.ZFULLNAME != ''
     ORDER BY f.ZASSETFORFACE, f.Z_PK";

/// Libraries older than macOS 13 name the face columns `ZASSET` / `ZPERSON`
const LEGACY_PERSONS_QUERY: &str = "SELECT f.ZASSET, p.ZFULLNAME
     FROM ZDETECTEDFACE f
     JOIN ZPERSON p ON p.Z_PK = f.ZPERSON
     WHERE p.ZFULLNAME IS NOT NULL AND p.ZFULLNAME != ''
     ORDER BY f.ZASSET, f.Z_PK";

const PLACES_QUERY: &str = "SELECT a.Z_PK, m.ZTITLE
     FROM ZASSET a
     JOIN ZMOMENT m ON m.Z_PK = a.ZMOMENT
     WHERE m.ZTITLE IS NOT NULL AND m.ZTITLE != ''";

/// An Apple Photos library on local disk
#[derive(Debug, Clone)]
pub struct PhotosLibrary {
    root: PathBuf,
}

/// Raw `ZASSET` row before persons and places are attached
struct AssetRow {
    id: i64,
    directory: Option<String>,
    filename: Option<String>,
    date_created: Option<f64>,
    kind_subtype: Option<i64>,
    original_filename: Option<String>,
    title: Option<String>,
}

impl PhotosLibrary {
    /// Point at a `.photoslibrary` bundle
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default library location: `~/Pictures/Photos Library.photoslibrary`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Pictures")
            .join("Photos Library.photoslibrary")
    }

    fn open(&self) -> Result<Connection, LibraryError> {
        let db_path = database_path(&self.root);

        // Probe with a plain open first so a privacy block surfaces as
        // PermissionDenied rather than a generic SQLite message.
        File::open(&db_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::NotFound {
                path: db_path.clone(),
            },
            ErrorKind::PermissionDenied => LibraryError::PermissionDenied {
                path: db_path.clone(),
            },
            _ => LibraryError::OpenFailed {
                path: db_path.clone(),
                reason: e.to_string(),
            },
        })?;

        Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| LibraryError::OpenFailed {
            path: db_path.clone(),
            reason: e.to_string(),
        })
    }

    fn load_assets(conn: &Connection) -> Result<Vec<AssetRow>, LibraryError> {
        let mut stmt = conn
            .prepare(ASSETS_QUERY)
            .map_err(|e| LibraryError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AssetRow {
                    id: row.get(0)?,
                    directory: row.get(1)?,
                    filename: row.get(2)?,
                    date_created: row.get(3)?,
                    kind_subtype: row.get(4)?,
                    original_filename: row.get(5)?,
                    title: row.get(6)?,
                })
            })
            .map_err(|e| LibraryError::QueryFailed(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| LibraryError::QueryFailed(e.to_string()))
    }

    /// Person tags per asset, trying the current face schema then the legacy one
    fn load_persons(conn: &Connection) -> rusqlite::Result<HashMap<i64, Vec<String>>> {
        Self::query_persons(conn, PERSONS_QUERY).or_else(|e| {
            debug!(error = %e, "Current face columns missing; trying legacy schema");
            Self::query_persons(conn, LEGACY_PERSONS_QUERY)
        })
    }

    fn query_persons(
        conn: &Connection,
        query: &str,
    ) -> rusqlite::Result<HashMap<i64, Vec<String>>> {
        let mut stmt = conn.prepare(query)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut persons: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            let (asset, name) = row?;
            let names = persons.entry(asset).or_default();
            // The same person can be detected twice in one photo
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(persons)
    }

    fn load_places(conn: &Connection) -> rusqlite::Result<HashMap<i64, String>> {
        let mut stmt = conn.prepare(PLACES_QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect()
    }

    /// Resolve the original's location on disk, if it has been downloaded
    fn local_path(&self, asset: &AssetRow) -> Option<PathBuf> {
        let directory = asset.directory.as_deref()?;
        let filename = asset.filename.as_deref()?;
        let path = self.root.join("originals").join(directory).join(filename);
        path.exists().then_some(path)
    }
}

/// Convert a Core Data timestamp to the local calendar date
fn core_data_date(timestamp: f64) -> Option<NaiveDate> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor() as i64 + CORE_DATA_EPOCH_OFFSET;
    DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&Local).date_naive())
}

impl PhotoLibrary for PhotosLibrary {
    fn library_path(&self) -> &Path {
        &self.root
    }

    fn photos(&self) -> Result<Vec<LibraryPhoto>, LibraryError> {
        let conn = self.open()?;
        let assets = Self::load_assets(&conn)?;

        let mut persons = Self::load_persons(&conn).unwrap_or_else(|e| {
            warn!(
                error = %e,
                "Could not read person tags; every photo will be untagged and \
                 person filters will find no one"
            );
            HashMap::new()
        });
        let mut places = Self::load_places(&conn).unwrap_or_else(|e| {
            warn!(error = %e, "Could not read place names; continuing without locations");
            HashMap::new()
        });

        debug!(assets = assets.len(), "Read assets from Photos library");

        let photos = assets
            .into_iter()
            .map(|asset| {
                let subtype = asset.kind_subtype.unwrap_or(0);
                LibraryPhoto {
                    path: self.local_path(&asset),
                    original_filename: asset
                        .original_filename
                        .clone()
                        .or_else(|| asset.filename.clone())
                        .unwrap_or_default(),
                    date: asset.date_created.and_then(core_data_date),
                    persons: persons.remove(&asset.id).unwrap_or_default(),
                    title: asset.title.clone(),
                    place_name: places.remove(&asset.id),
                    is_screenshot: subtype == SUBTYPE_SCREENSHOT,
                    is_screen_recording: subtype == SUBTYPE_SCREEN_RECORDING,
                }
            })
            .collect();

        Ok(photos)
    }
}
