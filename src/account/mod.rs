//! Account session bootstrap.
//!
//! [`SessionBootstrapper`] moves a client through
//! `Unauthenticated → Authenticating → Ready` (or `Failed`):
//!
//! 1. `login` exchanges username and password for a bearer token at
//!    `<api_url>/token`.
//! 2. The token is committed and seven enrichment fetches (profile, menu,
//!    content types, saved searches, localization, search operators,
//!    standard search fields) start together.
//! 3. Once all have settled the session is `Ready`; the
//!    [`EnrichmentReport`] says which fields made it.
//!
//! # Example
//!
//! ```rust,no_run
//! use docecm::account::{LoginCredentials, SessionBootstrapper};
//! use docecm::http::HttpClient;
//! use docecm::session::SessionStore;
//!
//! # async fn example() -> docecm::Result<()> {
//! let boot = SessionBootstrapper::new(HttpClient::new(), SessionStore::new());
//! boot.set_api_url("https://ecm.example.com");
//!
//! let outcome = boot.login(&LoginCredentials::new("eva", "secret")).await?;
//! for (field, err) in outcome.enrichment.failures() {
//!     eprintln!("{field} not loaded: {err}");
//! }
//!
//! boot.logout().await;
//! # Ok(())
//! # }
//! ```

mod bootstrap;
mod enrichment;

pub use bootstrap::{
    BootstrapState, LoginCredentials, LoginOutcome, SessionBootstrapper, TokenResponse,
};
pub use enrichment::{EnrichmentField, EnrichmentOutcome, EnrichmentReport};
