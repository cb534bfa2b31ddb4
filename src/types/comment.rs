use serde::{Deserialize, Serialize};

/// The author of a comment as embedded in comment listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentAuthor {
    pub id: String,
    pub name: Option<String>,
}

/// A comment left by a visitor on a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub markdown_id: String,
    pub visitor: CommentAuthor,
    pub created_at: i64,
}

/// Body of `POST /api/view/:id/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    pub content: Option<String>,
    pub visitor_id: Option<String>,
}
