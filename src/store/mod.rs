//! Client-local state for mdshare.
//!
//! Everything here is owned by one client session and injected explicitly;
//! there are no module-level singletons.

pub mod drafts;
pub mod kv_store;
pub mod optimistic;
pub mod persisted_state;
pub mod saved_links;
pub mod visitor_identity;

pub use kv_store::{FileStore, KeyValueStore, MemoryStore, UnavailableStore};
pub use optimistic::{apply_tentative, ReactionFlip, ReactionSnapshot, ReactionTracker, Transition};
pub use persisted_state::PersistedState;
pub use saved_links::SavedLinks;
pub use visitor_identity::VisitorIdentity;
