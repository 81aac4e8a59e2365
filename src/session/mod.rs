//! Client-side session store.
//!
//! One [`SessionState`] record per client holds the bearer token, the user
//! profile and the data fetched for it after login. It is shared through a
//! cloneable [`SessionStore`] handle and only changes through
//! [`Mutation`]s.
//!
//! # Architecture
//!
//! - [`SessionState`]: the record and its getters
//! - [`SessionStore`]: shared handle, commits mutations, hands out request contexts
//! - [`SessionPersistence`]: saves the record between runs
//!
//! # Example
//!
//! ```rust
//! use docecm::session::{Mutation, SessionStore};
//!
//! let store = SessionStore::new();
//! store.commit(Mutation::SetToken("abc".into()));
//! assert!(store.is_logged_in());
//!
//! store.commit(Mutation::ClearUser);
//! assert!(!store.is_logged_in());
//! ```

mod persist;
mod state;
mod store;

pub use persist::{FileSessionPersistence, MemorySessionPersistence, NAMESPACE, SessionPersistence};
pub use state::{Mutation, Role, SessionState};
pub use store::SessionStore;
