//! Reaction Manager for mdshare.
//!
//! A reaction is unique per `(visitor, markdown, type)`; toggling removes an
//! existing reaction or creates a missing one.

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::database::now_millis;
use crate::types::errors::ReactionError;
use crate::types::reaction::{ReactionSummary, ReactionType};

/// Trait defining reaction operations.
pub trait ReactionManagerTrait {
    /// Flips the visitor's reaction. Returns whether the visitor now reacts.
    fn toggle(&mut self, markdown_id: &str, visitor_id: &str, kind: ReactionType) -> Result<bool, ReactionError>;
    fn count(&self, markdown_id: &str, kind: ReactionType) -> Result<i64, ReactionError>;
    fn has_reacted(&self, markdown_id: &str, visitor_id: &str, kind: ReactionType) -> Result<bool, ReactionError>;
    fn summary(&self, markdown_id: &str, visitor_id: Option<&str>, kind: ReactionType) -> Result<ReactionSummary, ReactionError>;
}

/// Reaction manager backed by a SQLite connection.
pub struct ReactionManager<'a> {
    conn: &'a Connection,
}

impl<'a> ReactionManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn exists(&self, table: &str, id: &str) -> Result<bool, ReactionError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE id = ?1", table),
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl<'a> ReactionManagerTrait for ReactionManager<'a> {
    fn toggle(&mut self, markdown_id: &str, visitor_id: &str, kind: ReactionType) -> Result<bool, ReactionError> {
        if visitor_id.is_empty() {
            return Err(ReactionError::MissingVisitor);
        }
        if !self.exists("visitors", visitor_id)? {
            return Err(ReactionError::VisitorNotFound(visitor_id.to_string()));
        }
        if !self.exists("markdowns", markdown_id)? {
            return Err(ReactionError::MarkdownNotFound(markdown_id.to_string()));
        }

        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM reactions WHERE markdown_id = ?1 AND visitor_id = ?2 AND type = ?3",
            params![markdown_id, visitor_id, kind.as_str()],
        )?;

        let reacted = if removed > 0 {
            false
        } else {
            // The unique index turns a concurrent duplicate into a no-op.
            tx.execute(
                "INSERT OR IGNORE INTO reactions (id, type, visitor_id, markdown_id, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![Uuid::new_v4().to_string(), kind.as_str(), visitor_id, markdown_id, now_millis()],
            )?;
            true
        };
        tx.commit()?;

        tracing::debug!(markdown_id, visitor_id, kind = %kind, reacted, "reaction toggled");
        Ok(reacted)
    }

    fn count(&self, markdown_id: &str, kind: ReactionType) -> Result<i64, ReactionError> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM reactions WHERE markdown_id = ?1 AND type = ?2",
            params![markdown_id, kind.as_str()],
            |row| row.get(0),
        )?)
    }

    fn has_reacted(&self, markdown_id: &str, visitor_id: &str, kind: ReactionType) -> Result<bool, ReactionError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reactions WHERE markdown_id = ?1 AND visitor_id = ?2 AND type = ?3",
            params![markdown_id, visitor_id, kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn summary(&self, markdown_id: &str, visitor_id: Option<&str>, kind: ReactionType) -> Result<ReactionSummary, ReactionError> {
        let count = self.count(markdown_id, kind)?;
        let user_reacted = match visitor_id.filter(|v| !v.is_empty()) {
            Some(v) => self.has_reacted(markdown_id, v, kind)?,
            None => false,
        };
        Ok(ReactionSummary { count, user_reacted })
    }
}
