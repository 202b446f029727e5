//! Versioned schema for the package store.
//!
//! Each migration's DDL and its `schema_migrations` row commit in one
//! transaction, so a crash leaves either both or neither. DDL is written with
//! `IF NOT EXISTS` so databases created before version tracking still migrate.

use std::collections::HashSet;

use anyhow::{Context, Result};
use rusqlite::Connection;

struct Migration {
    version: &'static str,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: "001",
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .context("Failed to create schema_migrations table")?;

    let applied = applied_versions(conn)?;
    for migration in MIGRATIONS.iter().filter(|m| !applied.contains(m.version)) {
        apply(conn, migration).with_context(|| {
            format!(
                "Failed to apply migration {}: {}",
                migration.version, migration.name
            )
        })?;
    }
    Ok(())
}

fn applied_versions(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<HashSet<String>, _>>()?;
    Ok(versions)
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    tracing::info!(version = migration.version, name = migration.name, "Applying migration");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)",
        (migration.version, migration.name, chrono::Utc::now().to_rfc3339()),
    )?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn fresh_database_gets_every_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(table_exists(&conn, "packages"));
        let expected: HashSet<String> =
            MIGRATIONS.iter().map(|m| m.version.to_string()).collect();
        assert_eq!(applied_versions(&conn).unwrap(), expected);
    }

    #[test]
    fn rerunning_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(applied_versions(&conn).unwrap().len(), MIGRATIONS.len());
    }

    #[test]
    fn recovers_when_schema_exists_without_a_version_row() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(MIGRATIONS[0].sql).unwrap();
        conn.execute(
            "INSERT INTO packages (id, source_path, name, template_type, confidence, status, processed_at, body)
             VALUES ('p1', 'uploads/a', 'A', 'mcq', 90, 'ready', '2026-01-01T00:00:00Z', '{}')",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        assert!(applied_versions(&conn).unwrap().contains("001"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM packages", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn failed_migration_leaves_no_version_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let broken = Migration {
            version: "999",
            name: "broken",
            sql: "CREATE TABLE extra (id TEXT); NOT VALID SQL;",
        };
        assert!(apply(&conn, &broken).is_err());

        assert!(!applied_versions(&conn).unwrap().contains("999"));
        assert!(!table_exists(&conn, "extra"));
    }
}
