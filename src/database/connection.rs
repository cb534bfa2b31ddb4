//! Opening and configuring the SQLite connection behind the document store.

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use super::migrations;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Document store backing every server-side collection.
///
/// Owns one configured connection with the schema brought up to date.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path`, switches it to WAL and
    /// runs pending migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "opened database file");
        Self::prepare(conn)
    }

    /// Opens a throwaway in-memory database. WAL does not apply here.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, rusqlite::Error> {
        // Per connection; every cascade on groups relies on it.
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether this connection enforces foreign keys.
    pub fn foreign_keys_enabled(&self) -> Result<bool, rusqlite::Error> {
        self.conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0))
            .map(|on| on == 1)
    }

    /// Current journal mode as SQLite reports it (`wal`, `memory`, ...).
    pub fn journal_mode(&self) -> Result<String, rusqlite::Error> {
        self.conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
    }
}
