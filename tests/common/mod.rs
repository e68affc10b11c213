//! Shared fixtures for integration tests.
//!
//! Builds a miniature Photos library: `database/Photos.sqlite` with just the
//! tables photoping reads, plus original files under `originals/`.

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Core Data timestamp (seconds since 2001-01-01 UTC) for noon UTC on a date
pub fn core_data_noon(year: i32, month: u32, day: u32) -> f64 {
    let date = chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap();
    let noon = date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp();
    (noon - 978_307_200) as f64
}

pub struct FixtureLibrary {
    pub root: PathBuf,
}

impl FixtureLibrary {
    pub fn create(root: &Path) -> Self {
        fs::create_dir_all(root.join("database")).unwrap();
        let conn = Connection::open(Self::db_path_of(root)).unwrap();
        conn.execute_batch(
            "CREATE TABLE ZASSET (
                Z_PK INTEGER PRIMARY KEY, ZDIRECTORY TEXT, ZFILENAME TEXT,
                ZDATECREATED REAL, ZKINDSUBTYPE INTEGER, ZTRASHEDSTATE INTEGER,
                ZMOMENT INTEGER
             );
             CREATE TABLE ZADDITIONALASSETATTRIBUTES (
                Z_PK INTEGER PRIMARY KEY, ZASSET INTEGER, ZORIGINALFILENAME TEXT, ZTITLE TEXT
             );
             CREATE TABLE ZPERSON (Z_PK INTEGER PRIMARY KEY, ZFULLNAME TEXT);
             CREATE TABLE ZDETECTEDFACE (
                Z_PK INTEGER PRIMARY KEY, ZASSETFORFACE INTEGER, ZPERSONFORFACE INTEGER
             );
             CREATE TABLE ZMOMENT (Z_PK INTEGER PRIMARY KEY, ZTITLE TEXT);",
        )
        .unwrap();
        Self {
            root: root.to_path_buf(),
        }
    }

    fn db_path_of(root: &Path) -> PathBuf {
        root.join("database").join("Photos.sqlite")
    }

    pub fn db_path(&self) -> PathBuf {
        Self::db_path_of(&self.root)
    }

    fn conn(&self) -> Connection {
        Connection::open(self.db_path()).unwrap()
    }

    /// Add an asset whose original is on disk with `size` bytes
    pub fn add_photo(&self, id: i64, filename: &str, date: (i32, u32, u32), size: usize) {
        let dir = self.root.join("originals").join("0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(filename), vec![0u8; size]).unwrap();

        let conn = self.conn();
        conn.execute(
            "INSERT INTO ZASSET VALUES (?, '0', ?, ?, 0, 0, NULL)",
            params![id, filename, core_data_noon(date.0, date.1, date.2)],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO ZADDITIONALASSETATTRIBUTES VALUES (?, ?, ?, NULL)",
            params![id, id, filename],
        )
        .unwrap();
    }

    /// Tag an asset with a named person
    pub fn tag(&self, asset: i64, person_id: i64, name: &str) {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO ZPERSON VALUES (?, ?)",
            params![person_id, name],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO ZDETECTEDFACE (ZASSETFORFACE, ZPERSONFORFACE) VALUES (?, ?)",
            params![asset, person_id],
        )
        .unwrap();
    }

    pub fn mark_screenshot(&self, asset: i64) {
        self.conn()
            .execute("UPDATE ZASSET SET ZKINDSUBTYPE = 10 WHERE Z_PK = ?", [asset])
            .unwrap();
    }

    /// Pin the database mtime, i.e. the library fingerprint
    pub fn set_fingerprint(&self, secs: u64) {
        let file = File::options().append(true).open(self.db_path()).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }
}
