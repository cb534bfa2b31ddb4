//! Unit tests for the mdshare database layer (connection + migrations).

use mdshare::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use mdshare::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_connection_enforces_foreign_keys() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert!(db.foreign_keys_enabled().unwrap());
    assert_eq!(db.journal_mode().unwrap(), "memory");
}

#[test]
fn test_file_database_uses_wal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::open(dir.path().join("mdshare.db")).expect("open file database");
    assert_eq!(db.journal_mode().unwrap(), "wal");
    assert!(db.foreign_keys_enabled().unwrap());
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_tables = [
        "markdowns",
        "link_groups",
        "link_group_links",
        "visitors",
        "comments",
        "reactions",
        "schema_version",
    ];

    for table in &expected_tables {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    for index in &["idx_comments_markdown", "idx_reactions_markdown"] {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = mdshare::database::migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_open_file_database_keeps_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("mdshare.db");

    {
        let db = Database::open(&db_path).expect("open with file path should succeed");
        db.connection()
            .execute(
                "INSERT INTO markdowns (id, content, title, created_at) VALUES ('m1', '# Hi', NULL, 1)",
                [],
            )
            .expect("insert markdown");
    }
    assert!(db_path.exists(), "Database file should exist on disk");

    let reopened = Database::open(&db_path).expect("reopen");
    let content: String = reopened
        .connection()
        .query_row("SELECT content FROM markdowns WHERE id = 'm1'", [], |row| row.get(0))
        .expect("query markdown");
    assert_eq!(content, "# Hi");
}

#[test]
fn test_reactions_unique_per_visitor_markdown_type() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute_batch(
        "INSERT INTO markdowns (id, content, created_at) VALUES ('m1', 'x', 1);
         INSERT INTO visitors (id, name, created_at, last_active_at) VALUES ('v1', NULL, 1, 1);
         INSERT INTO reactions (id, type, visitor_id, markdown_id, created_at) VALUES ('r1', 'like', 'v1', 'm1', 1);",
    )
    .expect("seed rows");

    let duplicate = conn.execute(
        "INSERT INTO reactions (id, type, visitor_id, markdown_id, created_at) VALUES ('r2', 'like', 'v1', 'm1', 2)",
        [],
    );
    assert!(duplicate.is_err(), "a second identical reaction must be rejected");
}

#[test]
fn test_comments_require_existing_visitor() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute("INSERT INTO markdowns (id, content, created_at) VALUES ('m1', 'x', 1)", [])
        .expect("seed markdown");
    let orphan = conn.execute(
        "INSERT INTO comments (id, content, visitor_id, markdown_id, created_at) VALUES ('c1', 'hi', 'ghost', 'm1', 1)",
        [],
    );
    assert!(orphan.is_err(), "foreign keys should be enforced");
}

#[test]
fn test_deleting_group_cascades_to_links_only() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute_batch(
        "INSERT INTO markdowns (id, content, created_at) VALUES ('m1', 'x', 1);
         INSERT INTO link_groups (id, title, created_at) VALUES ('g1', 'G', 1);
         INSERT INTO link_group_links (group_id, markdown_id, position) VALUES ('g1', 'm1', 0);
         DELETE FROM link_groups WHERE id = 'g1';",
    )
    .expect("seed and delete");

    let links: i64 = conn
        .query_row("SELECT COUNT(*) FROM link_group_links", [], |row| row.get(0))
        .expect("count links");
    let docs: i64 = conn
        .query_row("SELECT COUNT(*) FROM markdowns", [], |row| row.get(0))
        .expect("count markdowns");
    assert_eq!(links, 0);
    assert_eq!(docs, 1);
}
