//! SQLite-backed [`PackageStore`] for sharing classifications across processes.

mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use coursepack_core::models::ProcessedPackage;
use coursepack_core::store::PackageStore;

/// Packages are stored as JSON bodies, with the lookup keys and a few summary
/// columns kept alongside for querying.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "coursepack")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("coursepack.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    fn query_one(&self, sql: &str, key: String) -> Result<Option<ProcessedPackage>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let body: Option<String> = conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        body.map(|b| decode(&b)).transpose()
    }
}

fn decode(body: &str) -> Result<ProcessedPackage> {
    serde_json::from_str(body).context("Stored package body is not valid JSON")
}

impl PackageStore for SqliteStore {
    fn get_by_path(&self, source_path: &str) -> Result<Option<ProcessedPackage>> {
        self.query_one(
            "SELECT body FROM packages WHERE source_path = ?",
            source_path.to_string(),
        )
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<ProcessedPackage>> {
        self.query_one("SELECT body FROM packages WHERE id = ?", id.to_string())
    }

    fn put(&self, package: &ProcessedPackage) -> Result<()> {
        let body = serde_json::to_string(package).context("Failed to serialize package")?;
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO packages
                (id, source_path, name, family, template_type, confidence, status, processed_at, body)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                package.id.to_string(),
                &package.source_path,
                &package.name,
                package.family.as_ref().map(|f| f.to_string()),
                package.template_type.as_str(),
                package.recommendation.confidence,
                package.status.as_str(),
                package.processed_at.to_rfc3339(),
                &body,
            ),
        )?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<ProcessedPackage>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT body FROM packages ORDER BY source_path")?;
        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        bodies.iter().map(|b| decode(b)).collect()
    }

    fn clear(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM packages", [])?;
        Ok(rows)
    }
}
