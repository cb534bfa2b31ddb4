//! Tentative apply, confirm or revert.
//!
//! A [`Transition`] is applied to local state before the request that
//! confirms it is sent. If the request fails, the exact inverse is applied
//! to whatever the state is at that moment, so concurrent confirmed changes
//! are kept.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::types::errors::ClientError;
use crate::types::reaction::{ReactionSummary, ReactionType};

/// An invertible state change. `invert(&apply(s)) == s` must hold.
pub trait Transition<S> {
    fn apply(&self, state: &S) -> S;
    fn invert(&self, state: &S) -> S;
}

/// Applies `transition` to `cell`, awaits `request`, and rolls back on error.
pub async fn apply_tentative<S, T, F, R, Err>(cell: &watch::Sender<S>, transition: &T, request: F) -> Result<R, Err>
where
    S: PartialEq,
    T: Transition<S>,
    F: Future<Output = Result<R, Err>>,
{
    cell.send_modify(|state| *state = transition.apply(state));
    let result = request.await;
    if result.is_err() {
        cell.send_if_modified(|state| {
            let reverted = transition.invert(state);
            let changed = reverted != *state;
            *state = reverted;
            changed
        });
    }
    result
}

/// Reaction count and membership as shown to one visitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSnapshot {
    pub count: i64,
    pub user_reacted: bool,
}

impl From<ReactionSummary> for ReactionSnapshot {
    fn from(summary: ReactionSummary) -> Self {
        Self {
            count: summary.count,
            user_reacted: summary.user_reacted,
        }
    }
}

/// Flips membership, moving the count by one in the matching direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactionFlip;

impl Transition<ReactionSnapshot> for ReactionFlip {
    fn apply(&self, state: &ReactionSnapshot) -> ReactionSnapshot {
        if state.user_reacted {
            ReactionSnapshot {
                count: state.count - 1,
                user_reacted: false,
            }
        } else {
            ReactionSnapshot {
                count: state.count + 1,
                user_reacted: true,
            }
        }
    }

    // A flip is its own inverse.
    fn invert(&self, state: &ReactionSnapshot) -> ReactionSnapshot {
        self.apply(state)
    }
}

/// Server side of reactions (`/api/view/:id/reactions`).
#[async_trait]
pub trait ReactionEndpoint: Send + Sync {
    async fn reactions(
        &self,
        markdown_id: &str,
        visitor_id: Option<&str>,
        kind: ReactionType,
    ) -> Result<ReactionSummary, ClientError>;

    async fn toggle_reaction(&self, markdown_id: &str, visitor_id: &str, kind: ReactionType) -> Result<bool, ClientError>;
}

/// Client-side reaction state for one document.
pub struct ReactionTracker<E> {
    markdown_id: String,
    kind: ReactionType,
    endpoint: E,
    snapshot: watch::Sender<ReactionSnapshot>,
}

impl<E: ReactionEndpoint> ReactionTracker<E> {
    pub fn new(markdown_id: impl Into<String>, kind: ReactionType, endpoint: E) -> Self {
        let (snapshot, _) = watch::channel(ReactionSnapshot::default());
        Self {
            markdown_id: markdown_id.into(),
            kind,
            endpoint,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> ReactionSnapshot {
        *self.snapshot.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReactionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Replaces local state with the server's view.
    pub async fn refresh(&self, visitor_id: Option<&str>) -> Result<ReactionSnapshot, ClientError> {
        let summary = self.endpoint.reactions(&self.markdown_id, visitor_id, self.kind).await?;
        let snapshot = ReactionSnapshot::from(summary);
        self.snapshot.send_replace(snapshot);
        Ok(snapshot)
    }

    /// Flips the visitor's reaction optimistically. On failure the flip is undone.
    pub async fn toggle(&self, visitor_id: Option<&str>) -> Result<ReactionSnapshot, ClientError> {
        let visitor_id = visitor_id.filter(|v| !v.is_empty()).ok_or(ClientError::NoVisitor)?;
        let request = self.endpoint.toggle_reaction(&self.markdown_id, visitor_id, self.kind);
        match apply_tentative(&self.snapshot, &ReactionFlip, request).await {
            Ok(reacted) => {
                let local = self.snapshot();
                if local.user_reacted != reacted {
                    // Local view drifted from the server; trust the server.
                    tracing::debug!(markdown_id = %self.markdown_id, reacted, "reaction state drifted, refreshing");
                    return self.refresh(Some(visitor_id)).await;
                }
                Ok(local)
            }
            Err(e) => {
                tracing::warn!(markdown_id = %self.markdown_id, error = %e, "reaction toggle failed, rolled back");
                Err(e)
            }
        }
    }
}
