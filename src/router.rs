//! Route table and HTTP server for mdshare.

use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::api_handler;
use crate::app::SharedApp;

/// Builds the API and page routes with tracing, CORS and body limits applied.
pub fn build_router(app: SharedApp) -> Router {
    let body_limit = app.settings.max_upload_bytes;

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .route("/api/upload", post(api_handler::upload))
        .route(
            "/api/view/:id",
            get(api_handler::get_markdown).put(api_handler::update_markdown),
        )
        .route(
            "/api/view/:id/comments",
            get(api_handler::list_comments).post(api_handler::add_comment),
        )
        .route(
            "/api/view/:id/reactions",
            get(api_handler::get_reactions).post(api_handler::toggle_reaction),
        )
        .route("/api/view/:id/generate-title", post(api_handler::generate_title))
        .route("/api/groups", post(api_handler::create_group))
        .route(
            "/api/groups/:id",
            get(api_handler::get_group)
                .put(api_handler::update_group)
                .delete(api_handler::delete_group),
        )
        .route("/api/visitor", post(api_handler::identify_visitor))
        .route("/view/:id", get(api_handler::view_page))
        .route("/view/:id/download", get(api_handler::download))
        .route("/group/:id", get(api_handler::group_page))
        .route("/healthz", get(api_handler::healthz))
        .with_state(app)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(trace)
}

/// Serves `router` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    serve_with_shutdown(listener, router, shutdown_signal()).await
}

/// Serves `router` until `signal` completes.
pub async fn serve_with_shutdown<F>(listener: TcpListener, router: Router, signal: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }
    axum::serve(listener, router).with_graceful_shutdown(signal).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}
