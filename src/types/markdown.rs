use serde::{Deserialize, Serialize};

/// Title given to text uploads that arrive without one.
pub const UNTITLED_MARKDOWN: &str = "Untitled Markdown";

/// A stored markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Markdown {
    pub id: String,
    pub content: String,
    pub title: Option<String>,
    pub created_at: i64,
}

impl Markdown {
    /// Title to show for the document, falling back to the placeholder.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_MARKDOWN)
    }
}

/// Response payload of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadReceipt {
    pub id: String,
}

/// Body of `PUT /api/view/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMarkdownRequest {
    pub content: Option<String>,
    pub title: Option<String>,
}

/// Optional body of `POST /api/view/:id/generate-title`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateTitleRequest {
    pub content: Option<String>,
}

/// Result of title generation. `title` is `None` when no provider could produce one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedTitle {
    pub title: Option<String>,
}
