use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kinds of reaction a visitor can leave on a document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    #[default]
    Like,
}

impl ReactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "like",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(ReactionType::Like),
            other => Err(format!("Invalid reaction type: {}", other)),
        }
    }
}

/// Reaction totals for one document and type, from one visitor's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub count: i64,
    pub user_reacted: bool,
}

/// Result of a reaction toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToggleOutcome {
    pub reacted: bool,
}

/// Query string of `GET /api/view/:id/reactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionQuery {
    pub visitor_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Body of `POST /api/view/:id/reactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    pub visitor_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
