//! REST transport for the ECM backend.
//!
//! Calls flow through two steps:
//!
//! - [`RequestConfig`] is the loose, defaulted configuration a caller
//!   writes, resolved into a [`RequestDescriptor`] against the API root.
//! - [`HttpClient`] sends a descriptor with the credential from a
//!   [`RequestContext`] and decodes the payload.
//!
//! # Example
//!
//! ```rust,no_run
//! use docecm::http::{Credential, HttpClient, RequestConfig, RequestContext};
//!
//! # async fn example() -> docecm::Result<()> {
//! let client = HttpClient::new();
//! let ctx = RequestContext::new("https://ecm.example.com", Credential::bearer("token"));
//! let menu = client.get(&ctx, RequestConfig::new("user/get-menu-options")).await?;
//! println!("{menu}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod request;

pub use client::{Credential, HttpClient, RequestContext};
pub use request::{
    FormPart, HttpVerb, Payload, RequestConfig, RequestDescriptor, ResponseType, content_type,
};
