//! HTTP handlers for the mdshare API.
//!
//! Every handler answers with an [`ApiEnvelope`]. Domain errors are mapped to
//! [`ApiError`], which picks the status code: 404 for missing records, 400 for
//! invalid input and 500 for everything else. Handlers lock the database only
//! for synchronous work and never hold the guard across an `.await`.

use std::sync::PoisonError;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::app::SharedApp;
use crate::managers::comment_manager::{CommentManager, CommentManagerTrait};
use crate::managers::group_manager::{GroupManager, GroupManagerTrait};
use crate::managers::markdown_manager::{MarkdownManager, MarkdownManagerTrait};
use crate::managers::reaction_manager::{ReactionManager, ReactionManagerTrait};
use crate::managers::visitor_manager::{VisitorManager, VisitorManagerTrait};
use crate::services::renderer;
use crate::types::api::{ApiEnvelope, HealthStatus};
use crate::types::comment::{Comment, NewCommentRequest};
use crate::types::errors::{CommentError, DocumentError, GroupError, ReactionError, VisitorError};
use crate::types::group::{CreateGroupRequest, PopulatedGroup, SharedGroup, UpdateGroupRequest};
use crate::types::markdown::{
    GenerateTitleRequest, GeneratedTitle, Markdown, UpdateMarkdownRequest, UploadReceipt, UNTITLED_MARKDOWN,
};
use crate::types::reaction::{ReactionQuery, ReactionSummary, ReactionType, ToggleOutcome, ToggleReactionRequest};
use crate::types::visitor::{IdentifyRequest, Visitor};

// ─── Errors ───

/// Error returned from a handler, rendered as a failure envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(ApiEnvelope::<()>::failure(self.to_string()))).into_response()
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) => ApiError::NotFound("Markdown not found".to_string()),
            DocumentError::MissingContent => ApiError::Validation(err.to_string()),
            DocumentError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<GroupError> for ApiError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::NotFound(_) => ApiError::NotFound("Group not found".to_string()),
            GroupError::MissingTitle => ApiError::Validation(err.to_string()),
            GroupError::Database(e) => ApiError::Internal(e.to_string()),
            GroupError::Document(e) => e.into(),
        }
    }
}

impl From<VisitorError> for ApiError {
    fn from(err: VisitorError) -> Self {
        match err {
            VisitorError::NotFound(_) => ApiError::NotFound("Visitor not found".to_string()),
            VisitorError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::MissingField => ApiError::Validation(err.to_string()),
            CommentError::VisitorNotFound(_) => ApiError::NotFound("Visitor not found".to_string()),
            CommentError::MarkdownNotFound(_) => ApiError::NotFound("Markdown not found".to_string()),
            CommentError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ReactionError> for ApiError {
    fn from(err: ReactionError) -> Self {
        match err {
            ReactionError::MissingVisitor | ReactionError::InvalidType(_) => ApiError::Validation(err.to_string()),
            ReactionError::VisitorNotFound(_) => ApiError::NotFound("Visitor not found".to_string()),
            ReactionError::MarkdownNotFound(_) => ApiError::NotFound("Markdown not found".to_string()),
            ReactionError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(err: PoisonError<T>) -> Self {
        ApiError::Internal(format!("database lock poisoned: {}", err))
    }
}

pub type ApiResult<T> = Result<Json<ApiEnvelope<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiEnvelope::ok(data)))
}

fn parse_kind(raw: Option<&str>) -> Result<ReactionType, ApiError> {
    match raw.filter(|k| !k.is_empty()) {
        None => Ok(ReactionType::default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::from(ReactionError::InvalidType(raw.to_string()))),
    }
}

// ─── Documents ───

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, String)>,
    text: Option<String>,
    title: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| ApiError::Validation(e.body_text()))?;
                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.file = Some((file_name, String::from_utf8_lossy(&bytes).into_owned()));
            }
            "text" => {
                let text = field.text().await.map_err(|e| ApiError::Validation(e.body_text()))?;
                form.text = Some(text).filter(|t| !t.is_empty());
            }
            "title" => {
                let title = field.text().await.map_err(|e| ApiError::Validation(e.body_text()))?;
                form.title = Some(title).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }
    Ok(form)
}

/// `POST /api/upload`
pub async fn upload(State(app): State<SharedApp>, multipart: Multipart) -> ApiResult<UploadReceipt> {
    let form = read_upload_form(multipart).await?;

    let (content, title) = match (form.file, form.text) {
        (Some((file_name, content)), _) => {
            let title = form.title.or(Some(file_name).filter(|n| !n.is_empty()));
            (content, title)
        }
        (None, Some(text)) => {
            let title = match form.title {
                Some(title) => Some(title),
                None if app.settings.title.auto_title_on_upload => app.title_generator.generate_title(&text).await,
                None => None,
            };
            (text, Some(title.unwrap_or_else(|| UNTITLED_MARKDOWN.to_string())))
        }
        (None, None) => return Err(ApiError::Validation("No content provided".to_string())),
    };

    let markdown = {
        let db = app.db()?;
        let created = MarkdownManager::new(db.connection()).create(&content, title.as_deref())?;
        created
    };
    tracing::info!(id = %markdown.id, bytes = content.len(), "markdown uploaded");
    ok(UploadReceipt { id: markdown.id })
}

/// `GET /api/view/:id`
pub async fn get_markdown(State(app): State<SharedApp>, Path(id): Path<String>) -> ApiResult<Markdown> {
    let db = app.db()?;
    let markdown = MarkdownManager::new(db.connection()).get(&id)?;
    ok(markdown)
}

/// `PUT /api/view/:id`
pub async fn update_markdown(
    State(app): State<SharedApp>,
    Path(id): Path<String>,
    body: Result<Json<UpdateMarkdownRequest>, JsonRejection>,
) -> ApiResult<Markdown> {
    let Json(req) = body?;
    let content = req.content.unwrap_or_default();
    let db = app.db()?;
    let markdown = MarkdownManager::new(db.connection()).update(&id, &content, req.title.as_deref())?;
    ok(markdown)
}

/// `POST /api/view/:id/generate-title`
///
/// Uses the body's content when given, otherwise the stored document. A
/// generator that produces nothing yields `{ "title": null }`.
pub async fn generate_title(
    State(app): State<SharedApp>,
    Path(id): Path<String>,
    body: Option<Json<GenerateTitleRequest>>,
) -> ApiResult<GeneratedTitle> {
    let supplied = body.and_then(|Json(req)| req.content).filter(|c| !c.is_empty());
    let content = match supplied {
        Some(content) => content,
        None => {
            let db = app.db()?;
            let stored = MarkdownManager::new(db.connection()).find(&id)?;
            match stored {
                Some(markdown) => markdown.content,
                None => return Err(ApiError::NotFound("Markdown not found".to_string())),
            }
        }
    };
    if content.trim().is_empty() {
        return Err(ApiError::Validation("No content to generate title from".to_string()));
    }

    let title = app.title_generator.generate_title(&content).await;
    ok(GeneratedTitle { title })
}

// ─── Comments ───

/// `GET /api/view/:id/comments`
pub async fn list_comments(State(app): State<SharedApp>, Path(id): Path<String>) -> ApiResult<Vec<Comment>> {
    let db = app.db()?;
    let comments = CommentManager::new(db.connection()).list_comments(&id)?;
    ok(comments)
}

/// `POST /api/view/:id/comments`
pub async fn add_comment(
    State(app): State<SharedApp>,
    Path(id): Path<String>,
    body: Result<Json<NewCommentRequest>, JsonRejection>,
) -> ApiResult<Comment> {
    let Json(req) = body?;
    let content = req.content.unwrap_or_default();
    let visitor_id = req.visitor_id.unwrap_or_default();
    let db = app.db()?;
    let comment = CommentManager::new(db.connection()).add_comment(&id, &visitor_id, &content)?;
    ok(comment)
}

// ─── Reactions ───

/// `GET /api/view/:id/reactions`
pub async fn get_reactions(
    State(app): State<SharedApp>,
    Path(id): Path<String>,
    query: Result<Query<ReactionQuery>, QueryRejection>,
) -> ApiResult<ReactionSummary> {
    let Query(query) = query?;
    let kind = parse_kind(query.kind.as_deref())?;
    let db = app.db()?;
    let summary = ReactionManager::new(db.connection()).summary(&id, query.visitor_id.as_deref(), kind)?;
    ok(summary)
}

/// `POST /api/view/:id/reactions`
pub async fn toggle_reaction(
    State(app): State<SharedApp>,
    Path(id): Path<String>,
    body: Result<Json<ToggleReactionRequest>, JsonRejection>,
) -> ApiResult<ToggleOutcome> {
    let Json(req) = body?;
    let visitor_id = req.visitor_id.unwrap_or_default();
    if visitor_id.is_empty() {
        return Err(ReactionError::MissingVisitor.into());
    }
    let kind = parse_kind(req.kind.as_deref())?;
    let db = app.db()?;
    let reacted = ReactionManager::new(db.connection()).toggle(&id, &visitor_id, kind)?;
    ok(ToggleOutcome { reacted })
}

// ─── Groups ───

/// `POST /api/groups`
pub async fn create_group(
    State(app): State<SharedApp>,
    body: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> ApiResult<SharedGroup> {
    let Json(req) = body?;
    let title = req.title.unwrap_or_default();
    let db = app.db()?;
    let group = GroupManager::new(db.connection()).create_group(&title, &req.link_ids)?;
    ok(group)
}

/// `GET /api/groups/:id`
pub async fn get_group(State(app): State<SharedApp>, Path(id): Path<String>) -> ApiResult<PopulatedGroup> {
    let db = app.db()?;
    let group = GroupManager::new(db.connection()).get_populated(&id)?;
    ok(group)
}

/// `PUT /api/groups/:id`, answering with the populated group.
pub async fn update_group(
    State(app): State<SharedApp>,
    Path(id): Path<String>,
    body: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> ApiResult<PopulatedGroup> {
    let Json(req) = body?;
    let db = app.db()?;
    let mut groups = GroupManager::new(db.connection());
    groups.update_group(&id, req.title.as_deref(), req.link_ids.as_deref())?;
    ok(groups.get_populated(&id)?)
}

/// `DELETE /api/groups/:id`
pub async fn delete_group(State(app): State<SharedApp>, Path(id): Path<String>) -> ApiResult<Value> {
    let db = app.db()?;
    GroupManager::new(db.connection()).delete_group(&id)?;
    ok(json!({}))
}

// ─── Visitors ───

/// `POST /api/visitor`
pub async fn identify_visitor(
    State(app): State<SharedApp>,
    body: Result<Json<IdentifyRequest>, JsonRejection>,
) -> ApiResult<Visitor> {
    let Json(req) = body?;
    let db = app.db()?;
    let visitor = VisitorManager::new(db.connection()).identify(req.id.as_deref(), req.name.as_deref())?;
    ok(visitor)
}

// ─── Pages ───

/// `GET /view/:id`
pub async fn view_page(State(app): State<SharedApp>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let found = {
        let db = app.db()?;
        let found = MarkdownManager::new(db.connection()).find(&id)?;
        found
    };
    Ok(match found {
        Some(markdown) => Html(renderer::document_page(&markdown, &app.settings.public_url)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html(renderer::not_found_page(
                "Markdown Not Found",
                "The markdown you're looking for doesn't exist or has been removed.",
            )),
        )
            .into_response(),
    })
}

/// `GET /view/:id/download`
pub async fn download(State(app): State<SharedApp>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let markdown = {
        let db = app.db()?;
        let markdown = MarkdownManager::new(db.connection()).get(&id)?;
        markdown
    };
    let disposition = format!("attachment; filename=\"markdown-{}.md\"", markdown.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        markdown.content,
    )
        .into_response())
}

/// `GET /group/:id`
pub async fn group_page(State(app): State<SharedApp>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let result = {
        let db = app.db()?;
        let result = GroupManager::new(db.connection()).get_populated(&id);
        result
    };
    match result {
        Ok(group) => Ok(Html(renderer::group_page(&group, &app.settings.public_url)).into_response()),
        Err(GroupError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Html(renderer::not_found_page(
                "Group Not Found",
                "The group you're looking for doesn't exist or has been removed.",
            )),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// `GET /healthz`
pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
