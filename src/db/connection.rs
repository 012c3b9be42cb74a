// src/db/connection.rs
//
// Database connection management for the tracked-book store
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::{LibraryError, LibraryResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Base directory for all per-owner library stores.
///
/// Path structure: {APP_DATA}/bookhub
pub fn default_library_base_dir() -> LibraryResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| LibraryError::Other("Could not determine app data directory".to_string()))?;

    Ok(app_data_dir.join("bookhub"))
}

/// Create a connection pool for the store at `db_path`.
///
/// Pool configuration:
/// - Max 15 connections (reasonable for a desktop library)
/// - SQLite in WAL mode for better concurrency
/// - Foreign keys enabled
/// - Busy timeout set to avoid immediate errors
pub fn create_connection_pool(db_path: &Path) -> LibraryResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(15)
        .build(manager)
        .map_err(|e| LibraryError::Pool(format!("Failed to create connection pool: {}", e)))?;

    Ok(pool)
}

/// Create a standalone in-memory connection (for testing).
pub fn create_test_connection() -> LibraryResult<Connection> {
    let conn = Connection::open_in_memory().map_err(LibraryError::Database)?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(LibraryError::Database)?;

    Ok(conn)
}
