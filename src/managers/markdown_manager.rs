//! Markdown Manager for mdshare.
//!
//! Implements `MarkdownManagerTrait`: create, read and update of stored
//! markdown documents, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::now_millis;
use crate::types::errors::DocumentError;
use crate::types::markdown::Markdown;

/// Trait defining document operations.
pub trait MarkdownManagerTrait {
    fn create(&mut self, content: &str, title: Option<&str>) -> Result<Markdown, DocumentError>;
    fn get(&self, id: &str) -> Result<Markdown, DocumentError>;
    fn find(&self, id: &str) -> Result<Option<Markdown>, DocumentError>;
    fn exists(&self, id: &str) -> Result<bool, DocumentError>;
    /// Replaces the content and, when given, the title.
    fn update(&mut self, id: &str, content: &str, title: Option<&str>) -> Result<Markdown, DocumentError>;
    /// Loads the documents with the given ids, in the given order, skipping missing ones.
    fn get_many(&self, ids: &[String]) -> Result<Vec<Markdown>, DocumentError>;
}

/// Document manager backed by a SQLite connection.
pub struct MarkdownManager<'a> {
    conn: &'a Connection,
}

impl<'a> MarkdownManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_markdown(row: &rusqlite::Row) -> rusqlite::Result<Markdown> {
        Ok(Markdown {
            id: row.get(0)?,
            content: row.get(1)?,
            title: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl<'a> MarkdownManagerTrait for MarkdownManager<'a> {
    /// Stores a new document. Empty content is rejected.
    fn create(&mut self, content: &str, title: Option<&str>) -> Result<Markdown, DocumentError> {
        if content.is_empty() {
            return Err(DocumentError::MissingContent);
        }

        let markdown = Markdown {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            title: title.filter(|t| !t.is_empty()).map(str::to_string),
            created_at: now_millis(),
        };

        self.conn.execute(
            "INSERT INTO markdowns (id, content, title, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![markdown.id, markdown.content, markdown.title, markdown.created_at],
        )?;

        tracing::debug!(id = %markdown.id, bytes = markdown.content.len(), "markdown stored");
        Ok(markdown)
    }

    fn get(&self, id: &str) -> Result<Markdown, DocumentError> {
        self.find(id)?
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }

    fn find(&self, id: &str) -> Result<Option<Markdown>, DocumentError> {
        let markdown = self
            .conn
            .query_row(
                "SELECT id, content, title, created_at FROM markdowns WHERE id = ?1",
                params![id],
                Self::row_to_markdown,
            )
            .optional()?;
        Ok(markdown)
    }

    fn exists(&self, id: &str) -> Result<bool, DocumentError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM markdowns WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn update(&mut self, id: &str, content: &str, title: Option<&str>) -> Result<Markdown, DocumentError> {
        if content.is_empty() {
            return Err(DocumentError::MissingContent);
        }

        let affected = match title.filter(|t| !t.is_empty()) {
            Some(t) => self.conn.execute(
                "UPDATE markdowns SET content = ?1, title = ?2 WHERE id = ?3",
                params![content, t, id],
            ),
            None => self.conn.execute(
                "UPDATE markdowns SET content = ?1 WHERE id = ?2",
                params![content, id],
            ),
        }?;

        if affected == 0 {
            return Err(DocumentError::NotFound(id.to_string()));
        }
        self.get(id)
    }

    fn get_many(&self, ids: &[String]) -> Result<Vec<Markdown>, DocumentError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, content, title, created_at FROM markdowns WHERE id = ?1")?;

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(markdown) = stmt
                .query_row(params![id], Self::row_to_markdown)
                .optional()?
            {
                results.push(markdown);
            }
        }
        Ok(results)
    }
}
