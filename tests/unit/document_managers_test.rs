//! Unit tests for the document, group, visitor, comment and reaction managers.

use mdshare::database::Database;
use mdshare::managers::comment_manager::{CommentManager, CommentManagerTrait};
use mdshare::managers::group_manager::{GroupManager, GroupManagerTrait};
use mdshare::managers::markdown_manager::{MarkdownManager, MarkdownManagerTrait};
use mdshare::managers::reaction_manager::{ReactionManager, ReactionManagerTrait};
use mdshare::managers::visitor_manager::{VisitorManager, VisitorManagerTrait};
use mdshare::types::errors::{CommentError, DocumentError, GroupError, ReactionError, VisitorError};
use mdshare::types::reaction::ReactionType;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

// ─── Markdown ───

#[test]
fn test_create_and_get_markdown() {
    let db = setup();
    let mut mgr = MarkdownManager::new(db.connection());

    let doc = mgr.create("# Hello", Some("Greeting")).unwrap();
    assert!(!doc.id.is_empty());
    assert!(doc.created_at > 0);

    let fetched = mgr.get(&doc.id).unwrap();
    assert_eq!(fetched, doc);
}

#[test]
fn test_create_rejects_empty_content() {
    let db = setup();
    let mut mgr = MarkdownManager::new(db.connection());
    assert!(matches!(mgr.create("", None), Err(DocumentError::MissingContent)));
}

#[test]
fn test_empty_title_is_stored_as_none() {
    let db = setup();
    let mut mgr = MarkdownManager::new(db.connection());
    let doc = mgr.create("x", Some("")).unwrap();
    assert!(doc.title.is_none());
}

#[test]
fn test_get_unknown_markdown() {
    let db = setup();
    let mgr = MarkdownManager::new(db.connection());
    assert!(matches!(mgr.get("missing"), Err(DocumentError::NotFound(_))));
    assert!(mgr.find("missing").unwrap().is_none());
    assert!(!mgr.exists("missing").unwrap());
}

#[test]
fn test_update_replaces_content_and_title() {
    let db = setup();
    let mut mgr = MarkdownManager::new(db.connection());
    let doc = mgr.create("old", None).unwrap();

    let updated = mgr.update(&doc.id, "new", Some("Titled")).unwrap();
    assert_eq!(updated.content, "new");
    assert_eq!(updated.title.as_deref(), Some("Titled"));
}

#[test]
fn test_update_unknown_or_empty() {
    let db = setup();
    let mut mgr = MarkdownManager::new(db.connection());
    assert!(matches!(mgr.update("missing", "x", None), Err(DocumentError::NotFound(_))));

    let doc = mgr.create("x", None).unwrap();
    assert!(matches!(mgr.update(&doc.id, "", None), Err(DocumentError::MissingContent)));
}

// ─── Groups ───

#[test]
fn test_group_create_and_populate_skips_missing_docs() {
    let db = setup();
    let a = MarkdownManager::new(db.connection()).create("a", Some("A")).unwrap();
    let b = MarkdownManager::new(db.connection()).create("b", None).unwrap();

    let mut groups = GroupManager::new(db.connection());
    let ids = vec![b.id.clone(), "ghost".to_string(), a.id.clone()];
    let group = groups.create_group("  Reading list ", &ids).unwrap();
    assert_eq!(group.title, "Reading list");
    assert_eq!(group.link_ids, ids);

    let populated = groups.get_populated(&group.id).unwrap();
    let shown: Vec<&str> = populated.links.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(shown, vec![b.id.as_str(), a.id.as_str()]);
}

#[test]
fn test_group_requires_title() {
    let db = setup();
    let mut groups = GroupManager::new(db.connection());
    assert!(matches!(groups.create_group("   ", &[]), Err(GroupError::MissingTitle)));
}

#[test]
fn test_group_update_and_delete() {
    let db = setup();
    let mut groups = GroupManager::new(db.connection());
    let group = groups.create_group("G", &["x".to_string()]).unwrap();

    let renamed = groups.update_group(&group.id, Some("Renamed"), None).unwrap();
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.link_ids, vec!["x".to_string()]);

    let relinked = groups
        .update_group(&group.id, Some(""), Some(&["y".to_string(), "z".to_string()]))
        .unwrap();
    assert_eq!(relinked.title, "Renamed");
    assert_eq!(relinked.link_ids, vec!["y".to_string(), "z".to_string()]);

    groups.delete_group(&group.id).unwrap();
    assert!(matches!(groups.get_group(&group.id), Err(GroupError::NotFound(_))));
    assert!(matches!(groups.delete_group(&group.id), Err(GroupError::NotFound(_))));
    assert!(matches!(
        groups.update_group(&group.id, Some("x"), None),
        Err(GroupError::NotFound(_))
    ));
}

#[test]
fn test_deleting_group_keeps_documents() {
    let db = setup();
    let doc = MarkdownManager::new(db.connection()).create("keep me", None).unwrap();
    let mut groups = GroupManager::new(db.connection());
    let group = groups.create_group("G", &[doc.id.clone()]).unwrap();

    groups.delete_group(&group.id).unwrap();
    assert!(MarkdownManager::new(db.connection()).exists(&doc.id).unwrap());
}

// ─── Visitors ───

#[test]
fn test_identify_creates_then_refreshes() {
    let db = setup();
    let mut visitors = VisitorManager::new(db.connection());

    let created = visitors.identify(None, Some("Ada")).unwrap();
    assert_eq!(created.name.as_deref(), Some("Ada"));
    assert_eq!(created.created_at, created.last_active_at);

    let again = visitors.identify(Some(&created.id), None).unwrap();
    assert_eq!(again.id, created.id);
    assert_eq!(again.name.as_deref(), Some("Ada"));
    assert!(again.last_active_at >= created.last_active_at);

    let renamed = visitors.identify(Some(&created.id), Some("Grace")).unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name.as_deref(), Some("Grace"));
}

#[test]
fn test_identify_unknown_id_issues_new_identity() {
    let db = setup();
    let mut visitors = VisitorManager::new(db.connection());
    let visitor = visitors.identify(Some("stale-id"), None).unwrap();
    assert_ne!(visitor.id, "stale-id");
    assert!(visitors.exists(&visitor.id).unwrap());
    assert!(matches!(visitors.get("stale-id"), Err(VisitorError::NotFound(_))));
}

#[test]
fn test_blank_name_does_not_clear_existing() {
    let db = setup();
    let mut visitors = VisitorManager::new(db.connection());
    let v = visitors.identify(None, Some("Ada")).unwrap();
    let again = visitors.identify(Some(&v.id), Some("   ")).unwrap();
    assert_eq!(again.name.as_deref(), Some("Ada"));
}

// ─── Comments ───

#[test]
fn test_comments_list_newest_first_with_author() {
    let db = setup();
    let doc = MarkdownManager::new(db.connection()).create("doc", None).unwrap();
    let visitor = VisitorManager::new(db.connection()).identify(None, Some("Ada")).unwrap();

    let mut comments = CommentManager::new(db.connection());
    comments.add_comment(&doc.id, &visitor.id, "first").unwrap();
    let second = comments.add_comment(&doc.id, &visitor.id, "second").unwrap();
    assert_eq!(second.visitor.id, visitor.id);
    assert_eq!(second.visitor.name.as_deref(), Some("Ada"));

    let listed = comments.list_comments(&doc.id).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].content, "second");
    assert_eq!(listed[1].content, "first");
}

#[test]
fn test_comment_validation() {
    let db = setup();
    let doc = MarkdownManager::new(db.connection()).create("doc", None).unwrap();
    let visitor = VisitorManager::new(db.connection()).identify(None, None).unwrap();
    let mut comments = CommentManager::new(db.connection());

    assert!(matches!(
        comments.add_comment(&doc.id, &visitor.id, "  "),
        Err(CommentError::MissingField)
    ));
    assert!(matches!(comments.add_comment(&doc.id, "", "hi"), Err(CommentError::MissingField)));
    assert!(matches!(
        comments.add_comment(&doc.id, "ghost", "hi"),
        Err(CommentError::VisitorNotFound(_))
    ));
    assert!(matches!(
        comments.add_comment("missing", &visitor.id, "hi"),
        Err(CommentError::MarkdownNotFound(_))
    ));
    assert!(comments.list_comments("missing").unwrap().is_empty());
}

// ─── Reactions ───

#[test]
fn test_reaction_toggle_false_true_false() {
    let db = setup();
    let doc = MarkdownManager::new(db.connection()).create("doc", None).unwrap();
    let visitor = VisitorManager::new(db.connection()).identify(None, None).unwrap();
    let mut reactions = ReactionManager::new(db.connection());

    let before = reactions.summary(&doc.id, Some(&visitor.id), ReactionType::Like).unwrap();
    assert_eq!(before.count, 0);
    assert!(!before.user_reacted);

    assert!(reactions.toggle(&doc.id, &visitor.id, ReactionType::Like).unwrap());
    let during = reactions.summary(&doc.id, Some(&visitor.id), ReactionType::Like).unwrap();
    assert_eq!(during.count, 1);
    assert!(during.user_reacted);

    assert!(!reactions.toggle(&doc.id, &visitor.id, ReactionType::Like).unwrap());
    let after = reactions.summary(&doc.id, Some(&visitor.id), ReactionType::Like).unwrap();
    assert_eq!(after.count, 0);
    assert!(!after.user_reacted);
}

#[test]
fn test_reaction_summary_without_visitor() {
    let db = setup();
    let doc = MarkdownManager::new(db.connection()).create("doc", None).unwrap();
    let visitor = VisitorManager::new(db.connection()).identify(None, None).unwrap();
    let mut reactions = ReactionManager::new(db.connection());
    reactions.toggle(&doc.id, &visitor.id, ReactionType::Like).unwrap();

    let anonymous = reactions.summary(&doc.id, None, ReactionType::Like).unwrap();
    assert_eq!(anonymous.count, 1);
    assert!(!anonymous.user_reacted);
}

#[test]
fn test_reaction_validation() {
    let db = setup();
    let doc = MarkdownManager::new(db.connection()).create("doc", None).unwrap();
    let visitor = VisitorManager::new(db.connection()).identify(None, None).unwrap();
    let mut reactions = ReactionManager::new(db.connection());

    assert!(matches!(
        reactions.toggle(&doc.id, "", ReactionType::Like),
        Err(ReactionError::MissingVisitor)
    ));
    assert!(matches!(
        reactions.toggle(&doc.id, "ghost", ReactionType::Like),
        Err(ReactionError::VisitorNotFound(_))
    ));
    assert!(matches!(
        reactions.toggle("missing", &visitor.id, ReactionType::Like),
        Err(ReactionError::MarkdownNotFound(_))
    ));
}
