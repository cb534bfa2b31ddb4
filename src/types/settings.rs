use serde::{Deserialize, Serialize};

/// Top-level server settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// SQLite database file. `None` uses `mdshare.db` in the platform data directory.
    pub database_path: Option<String>,
    /// Absolute base URL used when rendering share links.
    pub public_url: String,
    /// Maximum accepted request body, in bytes.
    pub max_upload_bytes: usize,
    pub title: TitleSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_path: None,
            public_url: "http://localhost:3000".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            title: TitleSettings::default(),
        }
    }
}

/// Providers able to generate document titles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleProvider {
    Groq,
    OpenAI,
}

impl TitleProvider {
    pub fn api_endpoint(&self) -> &'static str {
        match self {
            TitleProvider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            TitleProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            TitleProvider::Groq => "llama-3.1-8b-instant",
            TitleProvider::OpenAI => "gpt-4o",
        }
    }
}

/// Title generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TitleSettings {
    pub provider: Option<TitleProvider>,
    pub api_key: Option<String>,
    /// Overrides the provider's default model.
    pub model: Option<String>,
    /// Overrides the provider's endpoint (OpenAI-compatible servers).
    pub api_endpoint: Option<String>,
    /// Generate a title for untitled text uploads.
    pub auto_title_on_upload: bool,
}

impl TitleSettings {
    /// Returns the provider to use, if an API key is configured.
    pub fn effective_provider(&self) -> Option<TitleProvider> {
        match (&self.api_key, self.provider) {
            (Some(key), Some(provider)) if !key.is_empty() => Some(provider),
            (Some(key), None) if !key.is_empty() => Some(TitleProvider::OpenAI),
            _ => None,
        }
    }
}
