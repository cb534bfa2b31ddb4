use serde::{Deserialize, Serialize};

/// An anonymous identity used to attribute comments and reactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: String,
    pub name: Option<String>,
    pub created_at: i64,
    pub last_active_at: i64,
}

/// Body of `POST /api/visitor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifyRequest {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// The identity cached in the browser-local store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisitorState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub data: Option<Visitor>,
}
