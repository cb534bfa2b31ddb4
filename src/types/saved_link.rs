use serde::{Deserialize, Serialize};

/// A browser-local bookmark of a server-side document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedLink {
    pub id: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A personal, unsynchronized folder of saved link ids.
///
/// `link_ids` may reference links that have since been removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkGroup {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub link_ids: Vec<String>,
}

/// Everything the saved-links store persists, as one blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SavedLinksState {
    #[serde(default)]
    pub links: Vec<SavedLink>,
    #[serde(default)]
    pub groups: Vec<LinkGroup>,
}
