//! Stable anonymous identity for one local session.
//!
//! The cached `(id, name)` pair is sent to the identity endpoint, which
//! either refreshes a known visitor or mints a new one. The local slot only
//! changes when the server's answer differs from what is already cached.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::kv_store::KeyValueStore;
use crate::store::persisted_state::PersistedState;
use crate::types::errors::ClientError;
use crate::types::visitor::{Visitor, VisitorState};

/// Durable slot holding the cached visitor identity.
pub const VISITOR_KEY: &str = "md-viewer-visitor";

/// Server side of the identity handshake (`POST /api/visitor`).
#[async_trait]
pub trait IdentityEndpoint: Send + Sync {
    async fn identify(&self, id: Option<&str>, name: Option<&str>) -> Result<Visitor, ClientError>;
}

/// Visitor identity backed by a persisted slot and an [`IdentityEndpoint`].
pub struct VisitorIdentity<E> {
    state: PersistedState<VisitorState>,
    endpoint: E,
}

impl<E: IdentityEndpoint> VisitorIdentity<E> {
    pub fn new(store: Arc<dyn KeyValueStore>, endpoint: E) -> Self {
        Self {
            state: PersistedState::new(VISITOR_KEY, VisitorState::default(), store),
            endpoint,
        }
    }

    /// Hydrates the cache and resolves the identity against the server.
    pub async fn identify(&self) -> Result<Visitor, ClientError> {
        self.state.hydrate();
        let cached = self.state.get();
        let visitor = self
            .endpoint
            .identify(cached.id.as_deref(), cached.name.as_deref())
            .await?;
        self.remember(&visitor);
        Ok(visitor)
    }

    /// Renames the resolved visitor. Returns `None` when no identity is known yet.
    pub async fn update_name(&self, name: &str) -> Result<Option<Visitor>, ClientError> {
        let Some(id) = self.state.with(|s| s.data.as_ref().map(|v| v.id.clone())) else {
            return Ok(None);
        };
        let visitor = self.endpoint.identify(Some(&id), Some(name)).await?;
        self.remember(&visitor);
        Ok(Some(visitor))
    }

    fn remember(&self, visitor: &Visitor) {
        let changed = self.state.update(|prev| VisitorState {
            id: Some(visitor.id.clone()),
            name: visitor.name.clone().or_else(|| prev.name.clone()),
            data: Some(visitor.clone()),
        });
        if changed {
            tracing::debug!(visitor_id = %visitor.id, "visitor identity updated");
        }
    }

    /// True until the cache has been hydrated and an identity resolved.
    pub fn is_loading(&self) -> bool {
        !self.state.is_hydrated() || self.state.with(|s| s.data.is_none())
    }

    /// Loads the cached identity without contacting the server.
    pub fn hydrate(&self) -> bool {
        self.state.hydrate()
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.is_hydrated()
    }

    pub fn visitor(&self) -> Option<Visitor> {
        self.state.with(|s| s.data.clone())
    }

    /// The cached id, which may predate the last server round-trip.
    pub fn cached_id(&self) -> Option<String> {
        self.state.with(|s| s.id.clone())
    }

    pub fn state(&self) -> VisitorState {
        self.state.get()
    }

    /// Forgets the identity; the next [`identify`](Self::identify) mints a new one.
    pub fn forget(&self) {
        self.state.reset();
    }
}
