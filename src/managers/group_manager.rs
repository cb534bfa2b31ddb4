//! Shared Group Manager for mdshare.
//!
//! Server-side groups are named, ordered lists of document ids that can be
//! shared by link. Deleting a group never touches the documents it lists.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::now_millis;
use crate::managers::markdown_manager::{MarkdownManager, MarkdownManagerTrait};
use crate::types::errors::GroupError;
use crate::types::group::{PopulatedGroup, SharedGroup};

/// Trait defining shared group operations.
pub trait GroupManagerTrait {
    fn create_group(&mut self, title: &str, link_ids: &[String]) -> Result<SharedGroup, GroupError>;
    fn get_group(&self, id: &str) -> Result<SharedGroup, GroupError>;
    /// Loads a group together with the documents it still references.
    fn get_populated(&self, id: &str) -> Result<PopulatedGroup, GroupError>;
    fn update_group(
        &mut self,
        id: &str,
        title: Option<&str>,
        link_ids: Option<&[String]>,
    ) -> Result<SharedGroup, GroupError>;
    fn delete_group(&mut self, id: &str) -> Result<(), GroupError>;
}

/// Group manager backed by a SQLite connection.
pub struct GroupManager<'a> {
    conn: &'a Connection,
}

impl<'a> GroupManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn link_ids(&self, group_id: &str) -> Result<Vec<String>, GroupError> {
        let mut stmt = self.conn.prepare(
            "SELECT markdown_id FROM link_group_links WHERE group_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![group_id], |row| row.get(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    fn replace_links(&self, group_id: &str, link_ids: &[String]) -> Result<(), GroupError> {
        self.conn.execute(
            "DELETE FROM link_group_links WHERE group_id = ?1",
            params![group_id],
        )?;

        let mut stmt = self.conn.prepare(
            "INSERT INTO link_group_links (group_id, markdown_id, position) VALUES (?1, ?2, ?3)",
        )?;
        for (position, markdown_id) in link_ids.iter().enumerate() {
            stmt.execute(params![group_id, markdown_id, position as i64])?;
        }
        Ok(())
    }
}

impl<'a> GroupManagerTrait for GroupManager<'a> {
    fn create_group(&mut self, title: &str, link_ids: &[String]) -> Result<SharedGroup, GroupError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GroupError::MissingTitle);
        }

        let group = SharedGroup {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            link_ids: link_ids.to_vec(),
            created_at: now_millis(),
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO link_groups (id, title, created_at) VALUES (?1, ?2, ?3)",
            params![group.id, group.title, group.created_at],
        )?;
        self.replace_links(&group.id, &group.link_ids)?;
        tx.commit()?;

        tracing::info!(id = %group.id, links = group.link_ids.len(), "shared group created");
        Ok(group)
    }

    fn get_group(&self, id: &str) -> Result<SharedGroup, GroupError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, created_at FROM link_groups WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?)),
            )
            .optional()?;

        let (id, title, created_at) = row.ok_or_else(|| GroupError::NotFound(id.to_string()))?;
        let link_ids = self.link_ids(&id)?;
        Ok(SharedGroup {
            id,
            title,
            link_ids,
            created_at,
        })
    }

    fn get_populated(&self, id: &str) -> Result<PopulatedGroup, GroupError> {
        let group = self.get_group(id)?;
        let links = MarkdownManager::new(self.conn).get_many(&group.link_ids)?;
        Ok(PopulatedGroup {
            id: group.id,
            title: group.title,
            links,
            created_at: group.created_at,
        })
    }

    /// Updates the title and/or link list. An empty title is ignored.
    fn update_group(
        &mut self,
        id: &str,
        title: Option<&str>,
        link_ids: Option<&[String]>,
    ) -> Result<SharedGroup, GroupError> {
        let tx = self.conn.unchecked_transaction()?;

        let exists: i64 = tx.query_row(
            "SELECT COUNT(*) FROM link_groups WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(GroupError::NotFound(id.to_string()));
        }

        if let Some(t) = title.map(str::trim).filter(|t| !t.is_empty()) {
            tx.execute("UPDATE link_groups SET title = ?1 WHERE id = ?2", params![t, id])?;
        }
        if let Some(ids) = link_ids {
            self.replace_links(id, ids)?;
        }
        tx.commit()?;

        self.get_group(id)
    }

    fn delete_group(&mut self, id: &str) -> Result<(), GroupError> {
        let affected = self
            .conn
            .execute("DELETE FROM link_groups WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(GroupError::NotFound(id.to_string()));
        }
        tracing::info!(id, "shared group deleted");
        Ok(())
    }
}
