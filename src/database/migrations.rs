//! Schema migrations for the mdshare SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

use crate::database::now_millis;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup. Connection pragmas are set by
/// [`Database`](super::Database) before this runs.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: documents, groups, visitors, comments, reactions")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now_millis(), description],
    )?;
    Ok(())
}

/// V1: Create all collections.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS markdowns (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            title TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS link_groups (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        -- No foreign key on markdown_id: dangling references are filtered on read.
        CREATE TABLE IF NOT EXISTS link_group_links (
            group_id TEXT NOT NULL,
            markdown_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (group_id, position),
            FOREIGN KEY (group_id) REFERENCES link_groups(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS visitors (
            id TEXT PRIMARY KEY,
            name TEXT,
            created_at INTEGER NOT NULL,
            last_active_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            visitor_id TEXT NOT NULL,
            markdown_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (visitor_id) REFERENCES visitors(id),
            FOREIGN KEY (markdown_id) REFERENCES markdowns(id)
        );

        CREATE INDEX IF NOT EXISTS idx_comments_markdown ON comments(markdown_id, created_at);

        CREATE TABLE IF NOT EXISTS reactions (
            id TEXT PRIMARY KEY,
            type TEXT NOT NULL DEFAULT 'like',
            visitor_id TEXT NOT NULL,
            markdown_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            UNIQUE(visitor_id, markdown_id, type),
            FOREIGN KEY (visitor_id) REFERENCES visitors(id),
            FOREIGN KEY (markdown_id) REFERENCES markdowns(id)
        );

        CREATE INDEX IF NOT EXISTS idx_reactions_markdown ON reactions(markdown_id, type);
        ",
    )
}
