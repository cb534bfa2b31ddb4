//! Browser-local bookmarks and personal link groups.
//!
//! Every mutation is a pure transition of [`SavedLinksState`] applied through
//! [`PersistedState::update`], so calls issued back to back fold over the
//! latest state. Nothing here talks to the server; shared groups live in
//! [`crate::managers::group_manager`].

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::database::now_millis;
use crate::store::kv_store::KeyValueStore;
use crate::store::persisted_state::PersistedState;
use crate::types::saved_link::{LinkGroup, SavedLink, SavedLinksState};

/// Durable slot holding the saved links and groups.
pub const SAVED_LINKS_KEY: &str = "md-viewer-saved-links";

/// Placeholder title for a link saved without one.
pub fn default_link_title(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("Markdown {}", prefix)
}

/// Generates a time-ordered local group id.
pub fn new_group_id() -> String {
    format!("group-{}", Uuid::now_v7().simple())
}

impl SavedLinksState {
    pub fn contains(&self, id: &str) -> bool {
        self.links.iter().any(|link| link.id == id)
    }

    pub fn group(&self, group_id: &str) -> Option<&LinkGroup> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Prepends `link` unless a link with the same id exists.
    pub fn with_link(&self, link: SavedLink) -> Self {
        if self.contains(&link.id) {
            return self.clone();
        }
        let mut links = Vec::with_capacity(self.links.len() + 1);
        links.push(link);
        links.extend(self.links.iter().cloned());
        Self {
            links,
            groups: self.groups.clone(),
        }
    }

    /// Drops the link and strips its id from every group.
    pub fn without_link(&self, id: &str) -> Self {
        Self {
            links: self.links.iter().filter(|link| link.id != id).cloned().collect(),
            groups: self
                .groups
                .iter()
                .map(|group| LinkGroup {
                    link_ids: group.link_ids.iter().filter(|l| l.as_str() != id).cloned().collect(),
                    ..group.clone()
                })
                .collect(),
        }
    }

    pub fn with_group(&self, group: LinkGroup) -> Self {
        let mut groups = Vec::with_capacity(self.groups.len() + 1);
        groups.push(group);
        groups.extend(self.groups.iter().cloned());
        Self {
            links: self.links.clone(),
            groups,
        }
    }

    /// Removes a group. Its links stay in the flat list.
    pub fn without_group(&self, group_id: &str) -> Self {
        Self {
            links: self.links.clone(),
            groups: self.groups.iter().filter(|g| g.id != group_id).cloned().collect(),
        }
    }

    /// Appends the ids a group does not already hold, keeping existing order.
    pub fn with_group_links(&self, group_id: &str, link_ids: &[String]) -> Self {
        self.map_group(group_id, |group| {
            let mut ids = group.link_ids.clone();
            for id in link_ids {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
            ids
        })
    }

    /// Removes one id from one group, leaving the flat list alone.
    pub fn without_group_link(&self, group_id: &str, link_id: &str) -> Self {
        self.map_group(group_id, |group| {
            group.link_ids.iter().filter(|l| l.as_str() != link_id).cloned().collect()
        })
    }

    fn map_group(&self, group_id: &str, f: impl Fn(&LinkGroup) -> Vec<String>) -> Self {
        Self {
            links: self.links.clone(),
            groups: self
                .groups
                .iter()
                .map(|group| {
                    if group.id == group_id {
                        LinkGroup {
                            link_ids: f(group),
                            ..group.clone()
                        }
                    } else {
                        group.clone()
                    }
                })
                .collect(),
        }
    }

    /// Resolves a group's ids to saved links, skipping ids that were removed.
    pub fn group_links(&self, group_id: &str) -> Vec<SavedLink> {
        let Some(group) = self.group(group_id) else {
            return Vec::new();
        };
        group
            .link_ids
            .iter()
            .filter_map(|id| self.links.iter().find(|link| &link.id == id).cloned())
            .collect()
    }
}

/// Injectable store of saved links and local groups.
pub struct SavedLinks {
    state: PersistedState<SavedLinksState>,
}

impl SavedLinks {
    /// Creates the store over `store` and hydrates it.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let links = Self::new(store);
        links.state.hydrate();
        links
    }

    /// Creates the store without hydrating; see [`SavedLinks::hydrate`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: PersistedState::new(SAVED_LINKS_KEY, SavedLinksState::default(), store),
        }
    }

    pub fn hydrate(&self) -> bool {
        self.state.hydrate()
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.is_hydrated()
    }

    pub fn snapshot(&self) -> SavedLinksState {
        self.state.get()
    }

    pub fn links(&self) -> Vec<SavedLink> {
        self.state.with(|s| s.links.clone())
    }

    pub fn groups(&self) -> Vec<LinkGroup> {
        self.state.with(|s| s.groups.clone())
    }

    pub fn group(&self, group_id: &str) -> Option<LinkGroup> {
        self.state.with(|s| s.group(group_id).cloned())
    }

    /// Saved links referenced by a group, without tombstoned ids.
    pub fn group_links(&self, group_id: &str) -> Vec<SavedLink> {
        self.state.with(|s| s.group_links(group_id))
    }

    /// Saves a link. Returns `false` when it was already saved.
    pub fn save_link(&self, id: &str, title: Option<&str>) -> bool {
        let link = SavedLink {
            id: id.to_string(),
            created_at: now_millis(),
            title: Some(
                title
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| default_link_title(id)),
            ),
        };
        self.state.update(|prev| prev.with_link(link))
    }

    pub fn remove_link(&self, id: &str) {
        self.state.update(|prev| prev.without_link(id));
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.state.with(|s| s.contains(id))
    }

    /// Saves the link when absent, removes it when present. Returns whether it is now saved.
    pub fn toggle_saved(&self, id: &str, title: Option<&str>) -> bool {
        if self.is_saved(id) {
            self.remove_link(id);
            false
        } else {
            self.save_link(id, title);
            true
        }
    }

    pub fn create_group(&self, title: &str, link_ids: Vec<String>) -> LinkGroup {
        let mut unique: Vec<String> = Vec::with_capacity(link_ids.len());
        for id in link_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        let group = LinkGroup {
            id: new_group_id(),
            title: title.to_string(),
            created_at: now_millis(),
            link_ids: unique,
        };
        let created = group.clone();
        self.state.update(|prev| prev.with_group(group));
        created
    }

    pub fn delete_group(&self, group_id: &str) {
        self.state.update(|prev| prev.without_group(group_id));
    }

    pub fn add_to_group(&self, group_id: &str, link_ids: &[String]) {
        self.state.update(|prev| prev.with_group_links(group_id, link_ids));
    }

    pub fn remove_from_group(&self, group_id: &str, link_id: &str) {
        self.state.update(|prev| prev.without_group_link(group_id, link_id));
    }

    /// Clears every link and group, including the durable slot.
    pub fn clear(&self) {
        self.state.reset();
    }

    pub fn subscribe(&self) -> watch::Receiver<SavedLinksState> {
        self.state.subscribe()
    }
}
