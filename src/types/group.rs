use serde::{Deserialize, Serialize};

use super::markdown::Markdown;

/// A server-side, shareable group of document references.
///
/// Distinct from the browser-local [`LinkGroup`](super::saved_link::LinkGroup):
/// only groups created through the group endpoint live here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharedGroup {
    pub id: String,
    pub title: String,
    pub link_ids: Vec<String>,
    pub created_at: i64,
}

/// A shared group with its referenced documents loaded.
///
/// `links` only contains documents that still exist, in group order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedGroup {
    pub id: String,
    pub title: String,
    pub links: Vec<Markdown>,
    pub created_at: i64,
}

/// Body of `POST /api/groups`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub link_ids: Vec<String>,
}

/// Body of `PUT /api/groups/:id`. Absent or empty fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    pub title: Option<String>,
    pub link_ids: Option<Vec<String>>,
}
