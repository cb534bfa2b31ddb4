//! HTTP client for the mdshare API.
//!
//! Unwraps the `{ success, data, error }` envelope: failures become
//! [`ClientError::Api`] carrying the server's status and message.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::store::optimistic::ReactionEndpoint;
use crate::store::visitor_identity::IdentityEndpoint;
use crate::types::api::{ApiEnvelope, HealthStatus};
use crate::types::comment::Comment;
use crate::types::errors::ClientError;
use crate::types::group::{PopulatedGroup, SharedGroup};
use crate::types::markdown::{GeneratedTitle, Markdown, UploadReceipt};
use crate::types::reaction::{ReactionSummary, ReactionType, ToggleOutcome};
use crate::types::visitor::Visitor;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one mdshare server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Public page of a document.
    pub fn view_url(&self, id: &str) -> String {
        self.url(&format!("/view/{}", id))
    }

    /// Public page of a shared group.
    pub fn group_url(&self, id: &str) -> String {
        self.url(&format!("/group/{}", id))
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: fallback_message(status, &body),
                })
            }
        };

        if !envelope.success || !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.error.unwrap_or_else(|| fallback_message(status, "")),
            });
        }
        envelope.data.ok_or_else(|| ClientError::EmptyResponse(path.to_string()))
    }

    // ─── Documents ───

    /// Uploads markdown text. Without a title the server picks one.
    pub async fn upload_text(&self, text: &str, title: Option<&str>) -> Result<String, ClientError> {
        let mut form = Form::new().text("text", text.to_string());
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        let receipt: UploadReceipt = self
            .send("/api/upload", self.http.post(self.url("/api/upload")).multipart(form))
            .await?;
        Ok(receipt.id)
    }

    /// Uploads a file. Without a title the server uses the file name.
    pub async fn upload_file(&self, path: &Path, title: Option<&str>) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.md".to_string());
        let part = Part::bytes(bytes).file_name(file_name).mime_str("text/markdown")?;
        let mut form = Form::new().part("file", part);
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        let receipt: UploadReceipt = self
            .send("/api/upload", self.http.post(self.url("/api/upload")).multipart(form))
            .await?;
        Ok(receipt.id)
    }

    pub async fn get_markdown(&self, id: &str) -> Result<Markdown, ClientError> {
        let path = format!("/api/view/{}", id);
        self.send(&path, self.http.get(self.url(&path))).await
    }

    pub async fn update_markdown(&self, id: &str, content: &str, title: Option<&str>) -> Result<Markdown, ClientError> {
        let path = format!("/api/view/{}", id);
        let body = json!({ "content": content, "title": title });
        self.send(&path, self.http.put(self.url(&path)).json(&body)).await
    }

    /// Asks the server for a title. `Ok(None)` when no generator is configured.
    pub async fn generate_title(&self, id: &str, content: Option<&str>) -> Result<Option<String>, ClientError> {
        let path = format!("/api/view/{}/generate-title", id);
        let body = json!({ "content": content });
        let generated: GeneratedTitle = self.send(&path, self.http.post(self.url(&path)).json(&body)).await?;
        Ok(generated.title)
    }

    /// Fetches the raw markdown through the download route.
    pub async fn download(&self, id: &str) -> Result<String, ClientError> {
        let response = self.http.get(self.url(&format!("/view/{}/download", id))).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiEnvelope<Value>>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| fallback_message(status, &body));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    // ─── Comments ───

    pub async fn list_comments(&self, id: &str) -> Result<Vec<Comment>, ClientError> {
        let path = format!("/api/view/{}/comments", id);
        self.send(&path, self.http.get(self.url(&path))).await
    }

    pub async fn add_comment(&self, id: &str, visitor_id: &str, content: &str) -> Result<Comment, ClientError> {
        let path = format!("/api/view/{}/comments", id);
        let body = json!({ "content": content, "visitorId": visitor_id });
        self.send(&path, self.http.post(self.url(&path)).json(&body)).await
    }

    // ─── Groups ───

    pub async fn create_group(&self, title: &str, link_ids: &[String]) -> Result<SharedGroup, ClientError> {
        let body = json!({ "title": title, "linkIds": link_ids });
        self.send("/api/groups", self.http.post(self.url("/api/groups")).json(&body))
            .await
    }

    pub async fn get_group(&self, id: &str) -> Result<PopulatedGroup, ClientError> {
        let path = format!("/api/groups/{}", id);
        self.send(&path, self.http.get(self.url(&path))).await
    }

    pub async fn update_group(
        &self,
        id: &str,
        title: Option<&str>,
        link_ids: Option<&[String]>,
    ) -> Result<PopulatedGroup, ClientError> {
        let path = format!("/api/groups/{}", id);
        let body = json!({ "title": title, "linkIds": link_ids });
        self.send(&path, self.http.put(self.url(&path)).json(&body)).await
    }

    pub async fn delete_group(&self, id: &str) -> Result<(), ClientError> {
        let path = format!("/api/groups/{}", id);
        let _: Value = self.send(&path, self.http.delete(self.url(&path))).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.http.get(self.url("/healthz")).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    } else {
        body.chars().take(200).collect()
    }
}

#[async_trait]
impl IdentityEndpoint for ApiClient {
    async fn identify(&self, id: Option<&str>, name: Option<&str>) -> Result<Visitor, ClientError> {
        let body = json!({ "id": id, "name": name });
        self.send("/api/visitor", self.http.post(self.url("/api/visitor")).json(&body))
            .await
    }
}

#[async_trait]
impl ReactionEndpoint for ApiClient {
    async fn reactions(
        &self,
        markdown_id: &str,
        visitor_id: Option<&str>,
        kind: ReactionType,
    ) -> Result<ReactionSummary, ClientError> {
        let path = format!("/api/view/{}/reactions", markdown_id);
        let mut query = vec![("type", kind.as_str().to_string())];
        if let Some(visitor_id) = visitor_id {
            query.push(("visitorId", visitor_id.to_string()));
        }
        self.send(&path, self.http.get(self.url(&path)).query(&query)).await
    }

    async fn toggle_reaction(&self, markdown_id: &str, visitor_id: &str, kind: ReactionType) -> Result<bool, ClientError> {
        let path = format!("/api/view/{}/reactions", markdown_id);
        let body = json!({ "visitorId": visitor_id, "type": kind });
        let outcome: ToggleOutcome = self.send(&path, self.http.post(self.url(&path)).json(&body)).await?;
        Ok(outcome.reacted)
    }
}
