//! Visitor Manager for mdshare.
//!
//! Anonymous identities are created on first contact and refreshed on every
//! later identify call.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::now_millis;
use crate::types::errors::VisitorError;
use crate::types::visitor::Visitor;

/// Trait defining visitor identity operations.
pub trait VisitorManagerTrait {
    /// Creates-or-refreshes an identity.
    ///
    /// A known `id` gets its `last_active_at` bumped and, when `name` is
    /// non-empty, its name replaced. A missing or unknown `id` creates a new
    /// visitor carrying `name`.
    fn identify(&mut self, id: Option<&str>, name: Option<&str>) -> Result<Visitor, VisitorError>;
    fn get(&self, id: &str) -> Result<Visitor, VisitorError>;
    fn exists(&self, id: &str) -> Result<bool, VisitorError>;
}

/// Visitor manager backed by a SQLite connection.
pub struct VisitorManager<'a> {
    conn: &'a Connection,
}

impl<'a> VisitorManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn find(&self, id: &str) -> Result<Option<Visitor>, VisitorError> {
        let visitor = self
            .conn
            .query_row(
                "SELECT id, name, created_at, last_active_at FROM visitors WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Visitor {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                        last_active_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(visitor)
    }

    fn touch(&self, id: &str, name: Option<&str>) -> Result<Option<Visitor>, VisitorError> {
        let now = now_millis();
        let affected = match name {
            Some(n) => self.conn.execute(
                "UPDATE visitors SET last_active_at = ?1, name = ?2 WHERE id = ?3",
                params![now, n, id],
            ),
            None => self.conn.execute(
                "UPDATE visitors SET last_active_at = ?1 WHERE id = ?2",
                params![now, id],
            ),
        }?;

        if affected == 0 {
            return Ok(None);
        }
        self.find(id)
    }

    fn create(&self, name: Option<&str>) -> Result<Visitor, VisitorError> {
        let now = now_millis();
        let visitor = Visitor {
            id: Uuid::new_v4().to_string(),
            name: name.map(str::to_string),
            created_at: now,
            last_active_at: now,
        };
        self.conn.execute(
            "INSERT INTO visitors (id, name, created_at, last_active_at) VALUES (?1, ?2, ?3, ?4)",
            params![visitor.id, visitor.name, visitor.created_at, visitor.last_active_at],
        )?;
        tracing::info!(id = %visitor.id, "visitor created");
        Ok(visitor)
    }
}

impl<'a> VisitorManagerTrait for VisitorManager<'a> {
    fn identify(&mut self, id: Option<&str>, name: Option<&str>) -> Result<Visitor, VisitorError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        if let Some(id) = id.filter(|id| !id.is_empty()) {
            if let Some(visitor) = self.touch(id, name)? {
                return Ok(visitor);
            }
            tracing::debug!(id, "unknown visitor id, issuing a new identity");
        }

        self.create(name)
    }

    fn get(&self, id: &str) -> Result<Visitor, VisitorError> {
        self.find(id)?
            .ok_or_else(|| VisitorError::NotFound(id.to_string()))
    }

    fn exists(&self, id: &str) -> Result<bool, VisitorError> {
        Ok(self.find(id)?.is_some())
    }
}
