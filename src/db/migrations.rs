// src/db/migrations.rs
//
// Tracked-book store schema initialization
//
// PRINCIPLES:
// - Explicit schema versions
// - No automatic migrations
// - Idempotent operations

use crate::error::{LibraryError, LibraryResult};
use rusqlite::Connection;

/// Current schema version
/// Increment this when adding migrations
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initialize the store schema.
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> LibraryResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, 1)?;
    } else if current_version < CURRENT_SCHEMA_VERSION {
        // Future: apply incremental migrations here
        return Err(LibraryError::Other(format!(
            "Schema version {} is outdated. Expected {}. Manual migration required.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(LibraryError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Returns 0 if the schema_version table doesn't exist (fresh store)
fn get_schema_version(conn: &Connection) -> LibraryResult<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )
        .map_err(LibraryError::Database)?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(LibraryError::Database)?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> LibraryResult<()> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(LibraryError::Database)?;
    Ok(())
}

fn apply_initial_schema(conn: &Connection) -> LibraryResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS tracked_books (
            uuid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            file_path TEXT NOT NULL,
            creator TEXT NOT NULL,
            creation_date TEXT,
            format TEXT NOT NULL,
            document_size INTEGER NOT NULL,
            page_width REAL NOT NULL,
            page_height REAL NOT NULL,
            page_count INTEGER NOT NULL,
            added_to_library TEXT NOT NULL,
            last_opened TEXT,
            downloaded INTEGER NOT NULL,
            tags TEXT NOT NULL
        );",
    )
    .map_err(LibraryError::Database)?;

    Ok(())
}
