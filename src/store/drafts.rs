//! Per-editor draft text.

use std::sync::Arc;

use crate::store::kv_store::KeyValueStore;
use crate::store::persisted_state::PersistedState;

pub const DRAFT_KEY_PREFIX: &str = "markdown-editor-draft:";

pub fn draft_key(persistence_key: &str) -> String {
    format!("{}{}", DRAFT_KEY_PREFIX, persistence_key)
}

/// Opens and hydrates the draft slot for `persistence_key`.
pub fn open_draft(store: Arc<dyn KeyValueStore>, persistence_key: &str) -> PersistedState<String> {
    let draft = PersistedState::new(draft_key(persistence_key), String::new(), store);
    draft.hydrate();
    draft
}
