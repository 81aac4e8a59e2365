//! DocECM client
//!
//! Client-side SDK for the DocECM document management backend: REST
//! transport, session store and login bootstrap, plugin descriptors and UI
//! notifications.
//!
//! # Architecture
//!
//! - **Transport**: loose request configs resolved into descriptors and sent with reqwest
//! - **Session**: one shared record, changed only through named mutations, persisted between runs
//! - **Bootstrap**: token exchange followed by seven concurrent enrichment fetches
//! - **Plugins**: static descriptors with typed, plugin-owned configuration
//!
//! # Modules
//!
//! - [`http`]: request configuration and the HTTP client
//! - [`session`]: session record, store and persistence
//! - [`account`]: login, token restore and logout
//! - [`localization`]: language codes and backend language ids
//! - [`plugins`]: plugin descriptors and catalog
//! - [`notify`]: snackbar notifications
//! - [`config`]: client configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod account;
pub mod config;
pub mod error;
pub mod http;
pub mod localization;
pub mod notify;
pub mod plugins;
pub mod session;

pub use error::{Error, Result};

use std::sync::Arc;

use tracing::warn;

use account::{LoginCredentials, LoginOutcome, SessionBootstrapper};
use config::ClientConfig;
use http::HttpClient;
use notify::Notifier;
use plugins::PluginCatalog;
use session::{FileSessionPersistence, SessionPersistence, SessionStore};

/// Everything a front end needs, wired from one configuration.
#[derive(Debug, Clone)]
pub struct ClientState {
    /// Session bootstrap; also owns the store and the transport.
    pub account: SessionBootstrapper,
    /// Snapshot storage, if persistence is enabled.
    pub persistence: Option<Arc<dyn SessionPersistence>>,
    /// Available plugin descriptors.
    pub plugins: Arc<PluginCatalog>,
    /// UI notifications.
    pub notifier: Notifier,
    /// Global Configuration
    pub config: Arc<ClientConfig>,
}

impl ClientState {
    /// Build the client, restoring the persisted session first.
    ///
    /// Configured API url and default language win over restored values.
    pub async fn from_config(config: ClientConfig) -> Result<Self> {
        let persistence: Option<Arc<dyn SessionPersistence>> = config
            .session
            .persist
            .then(|| {
                Arc::new(FileSessionPersistence::new(&config.session.state_file))
                    as Arc<dyn SessionPersistence>
            });

        let restored = match &persistence {
            Some(p) => p.load().await?,
            None => None,
        };
        let store = SessionStore::from_state(restored.unwrap_or_default());

        let account =
            SessionBootstrapper::new(HttpClient::with_timeout(config.http.timeout())?, store);
        account.set_api_url(config.api.url.clone());
        account.set_default_language(config.api.default_language.clone());

        let plugins = match &config.plugins.file {
            Some(path) => PluginCatalog::with_file(path).await?,
            None => PluginCatalog::builtin(),
        };

        Ok(Self {
            account,
            persistence,
            plugins: Arc::new(plugins),
            notifier: Notifier::new(),
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        self.account.store()
    }

    /// Log in and save the resulting session.
    ///
    /// A rejected login still saves the cleared session. If that save fails
    /// it is only logged, and the login error is returned.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome> {
        match self.account.login(credentials).await {
            Ok(outcome) => {
                self.persist().await?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(persist_err) = self.persist().await {
                    warn!(
                        name: "client.persist.failed",
                        error = %persist_err,
                        "Could not save cleared session"
                    );
                }
                Err(err)
            }
        }
    }

    /// Save the current session, if persistence is enabled.
    pub async fn persist(&self) -> Result<()> {
        if let Some(p) = &self.persistence {
            p.save(&self.store().snapshot()).await?;
        }
        Ok(())
    }
}
