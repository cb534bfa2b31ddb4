//! Unit tests for the saved-links and local groups store.

use std::sync::Arc;

use mdshare::store::saved_links::{default_link_title, SAVED_LINKS_KEY};
use mdshare::store::{KeyValueStore, MemoryStore, SavedLinks};
use mdshare::types::saved_link::SavedLinksState;
use rstest::rstest;

fn open() -> (SavedLinks, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (SavedLinks::open(store.clone()), store)
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

// ─── Links ───

#[test]
fn test_save_link_prepends() {
    let (links, _) = open();
    links.save_link("aaa", Some("First"));
    links.save_link("bbb", Some("Second"));

    let saved = links.links();
    assert_eq!(saved[0].id, "bbb");
    assert_eq!(saved[1].id, "aaa");
    assert_eq!(saved[1].title.as_deref(), Some("First"));
}

#[test]
fn test_save_link_is_idempotent() {
    let (links, _) = open();
    assert!(links.save_link("abc", None));
    assert!(!links.save_link("abc", Some("Other title")));
    assert_eq!(links.links().len(), 1);
}

#[rstest]
#[case("6650f0c2d9a8", "Markdown 6650f0")]
#[case("abc", "Markdown abc")]
#[case("", "Markdown ")]
fn test_default_title_truncates_id(#[case] id: &str, #[case] expected: &str) {
    assert_eq!(default_link_title(id), expected);
}

#[test]
fn test_save_without_title_uses_placeholder() {
    let (links, _) = open();
    links.save_link("0123456789", None);
    assert_eq!(links.links()[0].title.as_deref(), Some("Markdown 012345"));
}

#[test]
fn test_remove_link_strips_from_groups() {
    let (links, _) = open();
    links.save_link("a", None);
    links.save_link("b", None);
    let g1 = links.create_group("One", ids(&["a", "b"]));
    let g2 = links.create_group("Two", ids(&["b"]));

    links.remove_link("b");

    assert!(!links.is_saved("b"));
    assert_eq!(links.group(&g1.id).unwrap().link_ids, ids(&["a"]));
    assert!(links.group(&g2.id).unwrap().link_ids.is_empty());
}

#[test]
fn test_toggle_saved() {
    let (links, _) = open();
    assert!(links.toggle_saved("x", None));
    assert!(links.is_saved("x"));
    assert!(!links.toggle_saved("x", None));
    assert!(!links.is_saved("x"));
}

// ─── Groups ───

#[test]
fn test_create_group_prepends_with_prefixed_id() {
    let (links, _) = open();
    let first = links.create_group("First", vec![]);
    let second = links.create_group("Second", ids(&["a"]));

    assert!(first.id.starts_with("group-"));
    assert_ne!(first.id, second.id);
    let groups = links.groups();
    assert_eq!(groups[0].id, second.id);
    assert_eq!(groups[1].id, first.id);
}

#[test]
fn test_delete_group_keeps_links() {
    let (links, _) = open();
    links.save_link("a", None);
    let group = links.create_group("G", ids(&["a"]));

    links.delete_group(&group.id);

    assert!(links.group(&group.id).is_none());
    assert!(links.is_saved("a"));
}

#[test]
fn test_add_to_group_appends_only_new_ids() {
    let (links, _) = open();
    let group = links.create_group("G", ids(&["a", "b"]));

    links.add_to_group(&group.id, &ids(&["b", "c", "a", "d", "c"]));

    assert_eq!(links.group(&group.id).unwrap().link_ids, ids(&["a", "b", "c", "d"]));
}

#[test]
fn test_add_to_unknown_group_is_noop() {
    let (links, _) = open();
    let before = links.snapshot();
    links.add_to_group("group-missing", &ids(&["a"]));
    assert_eq!(links.snapshot(), before);
}

#[test]
fn test_remove_from_group_leaves_flat_list() {
    let (links, _) = open();
    links.save_link("a", None);
    let group = links.create_group("G", ids(&["a"]));

    links.remove_from_group(&group.id, "a");

    assert!(links.group(&group.id).unwrap().link_ids.is_empty());
    assert!(links.is_saved("a"));
}

#[test]
fn test_group_links_filters_removed_ids() {
    let (links, _) = open();
    links.save_link("a", Some("A"));
    let group = links.create_group("G", ids(&["ghost", "a"]));

    let resolved = links.group_links(&group.id);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, "a");
}

// ─── Persistence ───

#[test]
fn test_state_is_written_under_saved_links_key() {
    let (links, store) = open();
    links.save_link("a", None);
    let group = links.create_group("G", ids(&["a"]));

    let raw = store.get(SAVED_LINKS_KEY).unwrap().expect("slot written");
    let stored: SavedLinksState = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.links[0].id, "a");
    assert_eq!(stored.groups[0].id, group.id);
    assert!(raw.contains("\"linkIds\""));
    assert!(raw.contains("\"createdAt\""));
}

#[test]
fn test_reopen_restores_state() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    {
        let links = SavedLinks::open(store.clone());
        links.save_link("a", Some("A"));
    }
    let reopened = SavedLinks::new(store);
    assert!(!reopened.is_hydrated());
    assert!(reopened.links().is_empty());

    reopened.hydrate();
    assert!(reopened.is_saved("a"));
}

#[test]
fn test_save_before_hydrate_keeps_earlier_links() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    {
        let links = SavedLinks::open(store.clone());
        links.save_link("aaaaaa1", Some("First"));
    }

    let links = SavedLinks::new(store.clone());
    links.save_link("bbbbbb2", Some("Second"));
    links.hydrate();

    let ids: Vec<String> = links.links().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec!["bbbbbb2".to_string(), "aaaaaa1".to_string()]);

    let reopened = SavedLinks::open(store);
    assert!(reopened.is_saved("aaaaaa1"));
    assert!(reopened.is_saved("bbbbbb2"));
}

#[test]
fn test_missing_fields_in_stored_blob_default() {
    let store = Arc::new(MemoryStore::new());
    store.set(SAVED_LINKS_KEY, r#"{"links":[{"id":"a","createdAt":1}]}"#).unwrap();

    let links = SavedLinks::open(store);
    assert!(links.is_saved("a"));
    assert!(links.groups().is_empty());
}
