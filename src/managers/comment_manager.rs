//! Comment Manager for mdshare.
//!
//! Comments are append-only; listings embed the author's id and name.

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::database::now_millis;
use crate::types::comment::{Comment, CommentAuthor};
use crate::types::errors::CommentError;

/// Trait defining comment operations.
pub trait CommentManagerTrait {
    fn add_comment(&mut self, markdown_id: &str, visitor_id: &str, content: &str) -> Result<Comment, CommentError>;
    /// Lists the comments on a document, newest first.
    fn list_comments(&self, markdown_id: &str) -> Result<Vec<Comment>, CommentError>;
}

/// Comment manager backed by a SQLite connection.
pub struct CommentManager<'a> {
    conn: &'a Connection,
}

impl<'a> CommentManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn count(&self, sql: &str, id: &str) -> Result<i64, CommentError> {
        Ok(self.conn.query_row(sql, params![id], |row| row.get(0))?)
    }

    fn row_to_comment(row: &rusqlite::Row) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: row.get(0)?,
            content: row.get(1)?,
            markdown_id: row.get(2)?,
            created_at: row.get(3)?,
            visitor: CommentAuthor {
                id: row.get(4)?,
                name: row.get(5)?,
            },
        })
    }
}

impl<'a> CommentManagerTrait for CommentManager<'a> {
    fn add_comment(&mut self, markdown_id: &str, visitor_id: &str, content: &str) -> Result<Comment, CommentError> {
        if content.trim().is_empty() || visitor_id.is_empty() {
            return Err(CommentError::MissingField);
        }
        if self.count("SELECT COUNT(*) FROM visitors WHERE id = ?1", visitor_id)? == 0 {
            return Err(CommentError::VisitorNotFound(visitor_id.to_string()));
        }
        if self.count("SELECT COUNT(*) FROM markdowns WHERE id = ?1", markdown_id)? == 0 {
            return Err(CommentError::MarkdownNotFound(markdown_id.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO comments (id, content, visitor_id, markdown_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, content, visitor_id, markdown_id, now_millis()],
        )?;

        let comment = self.conn.query_row(
            "SELECT c.id, c.content, c.markdown_id, c.created_at, v.id, v.name \
             FROM comments c JOIN visitors v ON v.id = c.visitor_id WHERE c.id = ?1",
            params![id],
            Self::row_to_comment,
        )?;
        Ok(comment)
    }

    fn list_comments(&self, markdown_id: &str) -> Result<Vec<Comment>, CommentError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.content, c.markdown_id, c.created_at, v.id, v.name \
             FROM comments c JOIN visitors v ON v.id = c.visitor_id \
             WHERE c.markdown_id = ?1 ORDER BY c.created_at DESC, c.rowid DESC",
        )?;

        let rows = stmt.query_map(params![markdown_id], Self::row_to_comment)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}
