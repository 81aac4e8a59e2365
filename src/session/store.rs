//! Shared handle to the session record.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::http::{Credential, RequestContext};
use crate::session::state::{Mutation, Role, SessionState};

/// Cloneable handle to the single session record of a client.
///
/// Mutations hold the lock only while the field is assigned; subscribers
/// see every committed state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(SessionState::default())
    }

    /// Create a store seeded with a restored snapshot.
    #[must_use]
    pub fn from_state(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { inner: Arc::new(tx) }
    }

    pub fn commit(&self, mutation: Mutation) {
        debug!(name: "session.mutation", mutation = mutation.name(), "Committing mutation");
        self.inner.send_modify(|state| state.apply(mutation));
    }

    /// Replace the whole record, e.g. after restoring from persistence.
    pub fn replace(&self, state: SessionState) {
        self.inner.send_replace(state);
    }

    /// Receive every state committed from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.borrow().clone()
    }

    /// Read the state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// API root and credential for the next request.
    #[must_use]
    pub fn request_context(&self) -> RequestContext {
        self.with_state(|s| RequestContext::new(s.api_url.clone(), Credential::bearer(s.token.clone())))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Getters
    // ─────────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.with_state(SessionState::is_logged_in)
    }

    #[must_use]
    pub fn current_role(&self) -> Role {
        self.with_state(SessionState::current_role)
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.with_state(|s| s.token.clone())
    }

    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.with_state(|s| Credential::bearer(s.token.clone()))
    }

    #[must_use]
    pub fn user(&self) -> Value {
        self.with_state(|s| s.user.clone())
    }

    #[must_use]
    pub fn user_menu(&self) -> Value {
        self.with_state(|s| s.user_menu.clone())
    }

    #[must_use]
    pub fn user_content_types(&self) -> Vec<Value> {
        self.with_state(|s| s.user_content_types.clone())
    }

    #[must_use]
    pub fn user_saved_searches(&self) -> Vec<Value> {
        self.with_state(|s| s.user_saved_searches.clone())
    }

    #[must_use]
    pub fn localization(&self) -> Option<Value> {
        self.with_state(|s| s.localization.clone())
    }

    #[must_use]
    pub fn api_url(&self) -> String {
        self.with_state(|s| s.api_url.clone())
    }

    #[must_use]
    pub fn search_operators(&self) -> Vec<Value> {
        self.with_state(|s| s.search_operators.clone())
    }

    #[must_use]
    pub fn search_standard_fields(&self) -> Vec<Value> {
        self.with_state(|s| s.search_standard_fields.clone())
    }

    #[must_use]
    pub fn login_params(&self) -> Option<Value> {
        self.with_state(|s| s.login_params.clone())
    }

    #[must_use]
    pub fn default_language(&self) -> Option<String> {
        self.with_state(|s| s.default_language.clone())
    }
}
