//! Title generation through an OpenAI-compatible chat-completions API.
//!
//! Generation is best effort: every failure is logged and reported as
//! `None`, and callers fall back to a file name or placeholder title.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::settings::TitleSettings;

/// Characters of content sent to the model.
pub const MAX_PROMPT_CHARS: usize = 2000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Something that can suggest a title for markdown content.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    async fn generate_title(&self, content: &str) -> Option<String>;
}

/// Builds the generator configured by `settings`.
pub fn from_settings(settings: &TitleSettings) -> Arc<dyn TitleGenerator> {
    let Some(provider) = settings.effective_provider() else {
        return Arc::new(DisabledTitleGenerator);
    };
    let api_key = settings.api_key.clone().unwrap_or_default();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| provider.default_model().to_string());
    let endpoint = settings
        .api_endpoint
        .clone()
        .unwrap_or_else(|| provider.api_endpoint().to_string());

    match ChatTitleGenerator::new(endpoint, api_key, model) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            tracing::warn!(error = %e, "failed to build title generation client, titles disabled");
            Arc::new(DisabledTitleGenerator)
        }
    }
}

/// Generator used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTitleGenerator;

#[async_trait]
impl TitleGenerator for DisabledTitleGenerator {
    async fn generate_title(&self, _content: &str) -> Option<String> {
        tracing::warn!("no API key found for title generation");
        None
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Generator backed by a chat-completions endpoint.
pub struct ChatTitleGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatTitleGenerator {
    pub fn new(endpoint: String, api_key: String, model: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_title(&self, content: &str) -> Result<Option<String>, reqwest::Error> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You write short titles for markdown documents. \
                              Reply with the title only, without quotes or trailing punctuation."
                        .to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(content),
                },
            ],
            temperature: 0.3,
            max_tokens: 32,
        };

        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .and_then(|raw| clean_title(&raw)))
    }
}

#[async_trait]
impl TitleGenerator for ChatTitleGenerator {
    async fn generate_title(&self, content: &str) -> Option<String> {
        match self.request_title(content).await {
            Ok(Some(title)) => Some(title),
            Ok(None) => {
                tracing::warn!(model = %self.model, "title generation returned no title");
                None
            }
            Err(e) => {
                tracing::error!(model = %self.model, error = %e, "error generating title");
                None
            }
        }
    }
}

/// Builds the user prompt from at most [`MAX_PROMPT_CHARS`] characters of content.
pub fn build_prompt(content: &str) -> String {
    let excerpt: String = content.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "Generate a concise and descriptive title for the following markdown content:\n\n{}",
        excerpt
    )
}

/// Trims whitespace, wrapping quotes and a leading heading marker from a model reply.
pub fn clean_title(raw: &str) -> Option<String> {
    let first_line = raw.lines().find(|l| !l.trim().is_empty())?;
    let title = first_line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
