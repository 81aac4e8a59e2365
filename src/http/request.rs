//! Request configuration and the descriptors built from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Result;

/// Content types understood by the backend.
pub mod content_type {
    pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded; charset=UTF-8";
    pub const FORM_DATA: &str = "multipart/form-data";
    pub const TEXT_PLAIN: &str = "text/plain";
    pub const JSON: &str = "application/json";
}

/// Path segment appended to the API root for every REST call.
pub const API_SUFFIX: &str = "/api/";

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    #[must_use]
    pub fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Expected format of the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    /// JSON wrapped in a callback, e.g. `cb({...})`.
    Jsonp,
    Xml,
    Text,
}

/// One part of a multipart form upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes,
        }
    }
}

/// Request body payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(Vec<FormPart>),
    Text(String),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Loose request configuration.
///
/// Every option except the path has a default; the path itself is optional
/// so that a missing URL fails at the transport instead of here.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub url: Option<String>,
    pub method: Option<HttpVerb>,
    pub data: Option<Payload>,
    pub data_type: Option<ResponseType>,
    pub content_type: Option<String>,
    pub post_form_data: bool,
}

impl RequestConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn method(mut self, method: HttpVerb) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn data_type(mut self, data_type: ResponseType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn post_form_data(mut self, enabled: bool) -> Self {
        self.post_form_data = enabled;
        self
    }

    /// Resolve defaults against the API root.
    ///
    /// A form-data request is always a multipart POST expecting JSON, no
    /// matter what method, content type or response type was asked for.
    #[must_use]
    pub fn build(self, api_root: &str) -> RequestDescriptor {
        let base_url = format!("{}{API_SUFFIX}", api_root.trim_end_matches('/'));

        let (method, content_type, response_type) = if self.post_form_data {
            (HttpVerb::Post, content_type::FORM_DATA.to_string(), ResponseType::Json)
        } else {
            (
                self.method.unwrap_or_default(),
                self.content_type
                    .unwrap_or_else(|| content_type::JSON.to_string()),
                self.data_type.unwrap_or_default(),
            )
        };

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), content_type);

        RequestDescriptor {
            base_url,
            method,
            url: self.url,
            headers,
            body: self.data,
            response_type,
        }
    }
}

/// Fully specified request, built per call and consumed by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub base_url: String,
    pub method: HttpVerb,
    pub url: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Payload>,
    pub response_type: ResponseType,
}

impl RequestDescriptor {
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type").map(String::as_str)
    }

    /// Absolute target URL. A missing path targets the API base itself.
    pub fn target(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        let path = self.url.as_deref().unwrap_or_default();
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "http://ecm.local";

    #[test]
    fn test_defaults_without_form_data() {
        let desc = RequestConfig::new("content-type/list").build(ROOT);

        assert_eq!(desc.method, HttpVerb::Get);
        assert_eq!(desc.response_type, ResponseType::Json);
        assert_eq!(desc.content_type(), Some(content_type::JSON));
        assert_eq!(desc.base_url, "http://ecm.local/api/");
        assert!(desc.body.is_none());
    }

    #[test]
    fn test_form_data_overrides_method_and_content_type() {
        let desc = RequestConfig::new("document/upload")
            .method(HttpVerb::Put)
            .content_type(content_type::TEXT_PLAIN)
            .data_type(ResponseType::Xml)
            .post_form_data(true)
            .data(Payload::Multipart(vec![FormPart::text("name", "scan.pdf")]))
            .build(ROOT);

        assert_eq!(desc.method, HttpVerb::Post);
        assert_eq!(desc.content_type(), Some(content_type::FORM_DATA));
        assert_eq!(desc.response_type, ResponseType::Json);
        assert!(matches!(desc.body, Some(Payload::Multipart(_))));
    }

    #[test]
    fn test_explicit_options_are_kept() {
        let desc = RequestConfig::new("document/save")
            .method(HttpVerb::Put)
            .content_type(content_type::FORM_URL_ENCODED)
            .data_type(ResponseType::Text)
            .data(json!({"id": 7}))
            .build(ROOT);

        assert_eq!(desc.method, HttpVerb::Put);
        assert_eq!(desc.content_type(), Some(content_type::FORM_URL_ENCODED));
        assert_eq!(desc.response_type, ResponseType::Text);
        assert_eq!(desc.body, Some(Payload::Json(json!({"id": 7}))));
    }

    #[test]
    fn test_target_joins_under_api_suffix() {
        let desc = RequestConfig::new("/account/current").build("http://ecm.local/root/");
        assert_eq!(
            desc.target().unwrap().as_str(),
            "http://ecm.local/root/api/account/current"
        );
    }

    #[test]
    fn test_missing_url_builds_and_targets_base() {
        let desc = RequestConfig::default().build(ROOT);
        assert!(desc.url.is_none());
        assert_eq!(desc.target().unwrap().as_str(), "http://ecm.local/api/");
    }

    #[test]
    fn test_unset_root_fails_at_target() {
        let desc = RequestConfig::new("account/current").build("");
        assert!(desc.target().is_err());
    }
}
