//! Login, session restore and logout.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::account::enrichment::{EnrichmentField, EnrichmentOutcome, EnrichmentReport};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::localization::{LocaleSource, SystemLocale, resolve_language_id};
use crate::session::{Mutation, SessionStore};

/// Where a client is in the login sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    Unauthenticated,
    /// Token exchange or enrichment in flight.
    Authenticating,
    Ready,
    /// The last login attempt was rejected.
    Failed,
}

/// Username/password pair for the token endpoint.
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by the token endpoint.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// A successful login and what the follow-up fetches produced.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: TokenResponse,
    pub enrichment: EnrichmentReport,
}

/// Drives the session from credentials to a populated [`SessionStore`].
///
/// Cloning is cheap; clones share the store, the transport and the state.
#[derive(Debug, Clone)]
pub struct SessionBootstrapper {
    inner: Arc<BootstrapperInner>,
}

#[derive(Debug)]
struct BootstrapperInner {
    http: HttpClient,
    store: SessionStore,
    locale: Arc<dyn LocaleSource>,
    state: watch::Sender<BootstrapState>,
}

impl SessionBootstrapper {
    #[must_use]
    pub fn new(http: HttpClient, store: SessionStore) -> Self {
        Self::with_locale(http, store, Arc::new(SystemLocale))
    }

    /// Use a specific source for the runtime UI language.
    #[must_use]
    pub fn with_locale(http: HttpClient, store: SessionStore, locale: Arc<dyn LocaleSource>) -> Self {
        let (state, _rx) = watch::channel(BootstrapState::Unauthenticated);
        Self {
            inner: Arc::new(BootstrapperInner {
                http,
                store,
                locale,
                state,
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    #[must_use]
    pub fn state(&self) -> BootstrapState {
        *self.inner.state.borrow()
    }

    /// Watch state transitions, e.g. to learn when a restored session is ready.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<BootstrapState> {
        self.inner.state.subscribe()
    }

    fn transition(&self, next: BootstrapState) {
        let prev = self.inner.state.send_replace(next);
        if prev != next {
            debug!(name: "session.state", from = ?prev, to = ?next, "Bootstrap state changed");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pre-login configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_api_url(&self, api_url: impl Into<String>) {
        self.store().commit(Mutation::SetApiUrl(api_url.into()));
    }

    pub fn set_login_params(&self, params: Value) {
        self.store().commit(Mutation::SetLoginParams(params));
    }

    pub fn set_default_language(&self, language: impl Into<String>) {
        self.store().commit(Mutation::SetDefaultLanguage(language.into()));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Login / restore / logout
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange credentials for a token, then populate the session.
    ///
    /// Returns once every enrichment fetch has settled. Enrichment failures
    /// are reported in [`LoginOutcome::enrichment`] and never fail the login.
    /// A rejected exchange clears the token and the user before returning.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome> {
        self.transition(BootstrapState::Authenticating);

        let token = match self.exchange_token(credentials).await {
            Ok(token) => token,
            Err(err) => {
                self.store().commit(Mutation::SetToken(String::new()));
                self.store().commit(Mutation::SetUser(Value::Null));
                self.transition(BootstrapState::Failed);
                warn!(
                    name: "session.login.failed",
                    username = %credentials.username,
                    error = %err,
                    "Login rejected"
                );
                return Err(err);
            }
        };

        self.store()
            .commit(Mutation::SetToken(token.access_token.clone()));
        info!(
            name: "session.login.succeeded",
            username = %credentials.username,
            "Token acquired"
        );

        let enrichment = self.enrich().await;
        self.mark_ready();

        Ok(LoginOutcome { token, enrichment })
    }

    /// POST the password grant straight to `<api_url>/token`.
    async fn exchange_token(&self, credentials: &LoginCredentials) -> Result<TokenResponse> {
        let api_url = self.store().api_url();
        if api_url.is_empty() {
            return Err(Error::MissingApiUrl);
        }
        let url = format!("{}/token", api_url.trim_end_matches('/'));

        let response = self
            .http()
            .transport()
            .post(url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("grant_type", "password"),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Store a token obtained elsewhere (e.g. a restored session) and
    /// populate the session in the background.
    ///
    /// The returned handle yields the enrichment report; dropping it leaves
    /// the batch running. An empty token stores `""` and starts nothing.
    pub fn set_token(&self, token: impl Into<String>) -> Option<JoinHandle<EnrichmentReport>> {
        let token = token.into();
        let empty = token.is_empty();
        self.store().commit(Mutation::SetToken(token));

        if empty {
            self.transition(BootstrapState::Unauthenticated);
            return None;
        }

        self.transition(BootstrapState::Authenticating);
        let this = self.clone();
        Some(tokio::spawn(async move {
            let report = this.enrich().await;
            this.mark_ready();
            report
        }))
    }

    /// Tell the backend (best effort) and forget the session.
    ///
    /// Never fails: a rejected or unreachable logout endpoint is logged and
    /// the local session is cleared regardless.
    pub async fn logout(&self) {
        let ctx = self.store().request_context();
        if ctx.credential.is_some() {
            if let Err(err) = self
                .http()
                .post(&ctx, RequestConfig::new("account/logout"))
                .await
            {
                warn!(name: "session.logout.remote_failed", error = %err, "Backend logout failed");
            }
        }

        self.store().commit(Mutation::ClearUser);
        self.transition(BootstrapState::Unauthenticated);
        info!(name: "session.logout", "Session cleared");
    }

    /// Ready only if nobody logged out while the batch ran.
    fn mark_ready(&self) {
        if self.store().is_logged_in() {
            self.transition(BootstrapState::Ready);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Enrichment
    // ─────────────────────────────────────────────────────────────────────────

    /// Start all seven fetches together and wait until each has settled.
    pub async fn enrich(&self) -> EnrichmentReport {
        let outcomes = join_all(EnrichmentField::ALL.map(|field| async move {
            let result = self.fetch(field).await;
            if let Err(err) = &result {
                warn!(
                    name: "enrichment.fetch.failed",
                    field = %field,
                    error = %err,
                    "Enrichment fetch failed"
                );
            }
            EnrichmentOutcome { field, result }
        }))
        .await;

        let report = EnrichmentReport { outcomes };
        info!(
            name: "enrichment.completed",
            succeeded = report.succeeded().count(),
            failed = report.failures().count(),
            "Enrichment batch settled"
        );
        report
    }

    /// Language id for the localization bundle, from the current state.
    #[must_use]
    pub fn language_id(&self) -> u8 {
        self.store().with_state(|s| {
            resolve_language_id(
                s.culture_code(),
                s.default_language.as_deref(),
                self.inner.locale.as_ref(),
            )
        })
    }

    /// Fetch one enrichment field and commit it.
    ///
    /// The result is dropped if the session credential changed while the
    /// request was in flight.
    pub async fn fetch(&self, field: EnrichmentField) -> Result<()> {
        let ctx = self.store().request_context();
        let language_id = match field {
            EnrichmentField::Localization => self.language_id(),
            _ => 0,
        };
        let value = self
            .http()
            .get(&ctx, RequestConfig::new(field.endpoint(language_id)))
            .await?;

        let mutation = match field {
            EnrichmentField::User => Mutation::SetUser(value),
            EnrichmentField::Menu => Mutation::SetUserMenu(value),
            EnrichmentField::ContentTypes => Mutation::SetUserContentTypes(into_list(value)?),
            EnrichmentField::SavedSearches => Mutation::SetUserSavedSearches(into_list(value)?),
            EnrichmentField::Localization => Mutation::SetLocalization(value),
            EnrichmentField::SearchOperators => Mutation::SetSearchOperators(into_list(value)?),
            EnrichmentField::SearchStandardFields => {
                Mutation::SetSearchStandardFields(into_list(value)?)
            }
        };

        // a logout or token change during the request owns the store now
        if self.store().credential() != ctx.credential {
            debug!(name: "enrichment.fetch.discarded", field = %field, "Session changed during fetch");
            return Ok(());
        }
        self.store().commit(mutation);
        Ok(())
    }

    pub async fn fetch_user(&self) -> Result<()> {
        self.fetch(EnrichmentField::User).await
    }

    pub async fn fetch_user_menu(&self) -> Result<()> {
        self.fetch(EnrichmentField::Menu).await
    }

    pub async fn fetch_user_content_types(&self) -> Result<()> {
        self.fetch(EnrichmentField::ContentTypes).await
    }

    pub async fn fetch_user_saved_searches(&self) -> Result<()> {
        self.fetch(EnrichmentField::SavedSearches).await
    }

    pub async fn fetch_localization(&self) -> Result<()> {
        self.fetch(EnrichmentField::Localization).await
    }

    pub async fn fetch_search_operators(&self) -> Result<()> {
        self.fetch(EnrichmentField::SearchOperators).await
    }

    pub async fn fetch_search_standard_fields(&self) -> Result<()> {
        self.fetch(EnrichmentField::SearchStandardFields).await
    }
}

/// List payloads; an empty body counts as an empty list.
fn into_list(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}
