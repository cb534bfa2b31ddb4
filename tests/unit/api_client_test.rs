//! End-to-end tests: `ApiClient`, `VisitorIdentity` and `ReactionTracker`
//! against a live server on an ephemeral port.

use std::sync::Arc;

use mdshare::app::App;
use mdshare::client::ApiClient;
use mdshare::router::{build_router, serve_with_shutdown};
use mdshare::store::{MemoryStore, ReactionSnapshot, ReactionTracker, SavedLinks, VisitorIdentity};
use mdshare::types::errors::ClientError;
use mdshare::types::reaction::ReactionType;
use mdshare::types::settings::ServerSettings;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A running server; dropping it shuts the server down.
struct TestServer {
    client: ApiClient,
    _shutdown: oneshot::Sender<()>,
}

async fn start() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = build_router(App::in_memory(ServerSettings::default()).expect("app").shared());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = serve_with_shutdown(listener, router, async move {
            let _ = rx.await;
        })
        .await;
    });

    TestServer {
        client: ApiClient::new(&format!("http://{}", addr)).expect("client"),
        _shutdown: tx,
    }
}

#[tokio::test]
async fn test_health() {
    let server = start().await;
    assert_eq!(server.client.health().await.unwrap().status, "ok");
}

#[tokio::test]
async fn test_upload_view_edit_download() {
    let server = start().await;
    let client = &server.client;

    let id = client.upload_text("# Hello", None).await.unwrap();
    let doc = client.get_markdown(&id).await.unwrap();
    assert_eq!(doc.content, "# Hello");
    assert_eq!(doc.title.as_deref(), Some("Untitled Markdown"));

    let edited = client.update_markdown(&id, "# Edited", Some("Edited")).await.unwrap();
    assert_eq!(edited.title.as_deref(), Some("Edited"));
    assert_eq!(client.download(&id).await.unwrap(), "# Edited");

    assert_eq!(client.generate_title(&id, None).await.unwrap(), None);
    assert!(client.view_url(&id).ends_with(&format!("/view/{}", id)));
}

#[tokio::test]
async fn test_upload_file() {
    let server = start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    std::fs::write(&path, "# From disk").unwrap();

    let id = server.client.upload_file(&path, None).await.unwrap();
    let doc = server.client.get_markdown(&id).await.unwrap();
    assert_eq!(doc.content, "# From disk");
    assert_eq!(doc.title.as_deref(), Some("notes.md"));
}

#[tokio::test]
async fn test_errors_carry_status_and_message() {
    let server = start().await;

    let err = server.client.get_markdown("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, ClientError::Api { ref message, .. } if message == "Markdown not found"));

    let err = server.client.download("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_identity_comments_and_reactions() {
    let server = start().await;
    let client = server.client.clone();
    let id = client.upload_text("doc", None).await.unwrap();

    let identity = VisitorIdentity::new(Arc::new(MemoryStore::new()), client.clone());
    let visitor = identity.identify().await.unwrap();
    let renamed = identity.update_name("Ada").await.unwrap().expect("identity known");
    assert_eq!(renamed.id, visitor.id);

    let comment = client.add_comment(&id, &visitor.id, "Looks good").await.unwrap();
    assert_eq!(comment.visitor.name.as_deref(), Some("Ada"));
    assert_eq!(client.list_comments(&id).await.unwrap().len(), 1);

    let tracker = ReactionTracker::new(id.clone(), ReactionType::Like, client.clone());
    let me = identity.cached_id();
    tracker.refresh(me.as_deref()).await.unwrap();
    assert_eq!(
        tracker.toggle(me.as_deref()).await.unwrap(),
        ReactionSnapshot { count: 1, user_reacted: true }
    );
    assert_eq!(
        tracker.toggle(me.as_deref()).await.unwrap(),
        ReactionSnapshot { count: 0, user_reacted: false }
    );
}

#[tokio::test]
async fn test_failed_toggle_rolls_back_against_server() {
    let server = start().await;
    let client = server.client.clone();

    let tracker = ReactionTracker::new("missing", ReactionType::Like, client.clone());
    let visitor = VisitorIdentity::new(Arc::new(MemoryStore::new()), client)
        .identify()
        .await
        .unwrap();

    let err = tracker.toggle(Some(&visitor.id)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(tracker.snapshot(), ReactionSnapshot::default());
}

#[tokio::test]
async fn test_share_local_group() {
    let server = start().await;
    let client = &server.client;
    let links = SavedLinks::open(Arc::new(MemoryStore::new()));

    let a = client.upload_text("a", Some("A")).await.unwrap();
    let b = client.upload_text("b", Some("B")).await.unwrap();
    links.save_link(&a, Some("A"));
    links.save_link(&b, Some("B"));
    let local = links.create_group("Reading", vec![a.clone(), b.clone()]);

    let shared = client.create_group(&local.title, &local.link_ids).await.unwrap();
    let fetched = client.get_group(&shared.id).await.unwrap();
    assert_eq!(fetched.title, "Reading");
    assert_eq!(fetched.links.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), vec![a.clone(), b.clone()]);

    let updated = client
        .update_group(&shared.id, Some("Renamed"), Some(&[b.clone()]))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.links.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), vec![b]);

    client.delete_group(&shared.id).await.unwrap();
    assert_eq!(client.get_group(&shared.id).await.unwrap_err().status(), Some(404));
    assert!(client.get_markdown(&a).await.is_ok());
}
