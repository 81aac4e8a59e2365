//! HTTP client for the ECM REST backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::request::{FormPart, HttpVerb, Payload, RequestConfig, RequestDescriptor, ResponseType};

/// Bearer credential presented with a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty token.
    pub fn bearer(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        (!token.is_empty()).then_some(Self(token))
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn header_value(&self) -> String {
        format!("bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Per-call inputs taken from the session: where to send the request and
/// which identity to present.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub api_root: String,
    pub credential: Option<Credential>,
}

impl RequestContext {
    pub fn new(api_root: impl Into<String>, credential: Option<Credential>) -> Self {
        Self {
            api_root: api_root.into(),
            credential,
        }
    }
}

/// HTTP client for the API.
///
/// Holds no identity of its own; each call carries its credential in the
/// [`RequestContext`], so concurrent calls under different identities do
/// not interfere.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a client whose transport enforces a request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Underlying transport, for calls that bypass the request builder.
    #[must_use]
    pub fn transport(&self) -> &reqwest::Client {
        &self.http
    }

    pub async fn get(&self, ctx: &RequestContext, config: RequestConfig) -> Result<Value> {
        self.request(ctx, HttpVerb::Get, config).await
    }

    pub async fn post(&self, ctx: &RequestContext, config: RequestConfig) -> Result<Value> {
        self.request(ctx, HttpVerb::Post, config).await
    }

    pub async fn put(&self, ctx: &RequestContext, config: RequestConfig) -> Result<Value> {
        self.request(ctx, HttpVerb::Put, config).await
    }

    pub async fn delete(&self, ctx: &RequestContext, config: RequestConfig) -> Result<Value> {
        self.request(ctx, HttpVerb::Delete, config).await
    }

    pub async fn post_form_data(&self, ctx: &RequestContext, config: RequestConfig) -> Result<Value> {
        self.request(ctx, HttpVerb::Post, config.post_form_data(true))
            .await
    }

    /// GET and deserialize the payload.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        config: RequestConfig,
    ) -> Result<T> {
        let value = self.get(ctx, config).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn request(
        &self,
        ctx: &RequestContext,
        verb: HttpVerb,
        config: RequestConfig,
    ) -> Result<Value> {
        if ctx.api_root.is_empty() {
            return Err(Error::MissingApiUrl);
        }
        let descriptor = config.method(verb).build(&ctx.api_root);
        self.execute(&descriptor, ctx.credential.as_ref()).await
    }

    /// Send a descriptor and decode the response by its response type.
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        credential: Option<&Credential>,
    ) -> Result<Value> {
        let url = descriptor.target()?;

        debug!(
            name: "http.request",
            method = ?descriptor.method,
            url = %url,
            authenticated = credential.is_some(),
            "Sending request"
        );

        let mut builder = self.http.request(descriptor.method.as_method(), url);

        let multipart = matches!(descriptor.body, Some(Payload::Multipart(_)));
        for (name, value) in &descriptor.headers {
            // the transport writes its own multipart header with the boundary
            if multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name, value);
        }

        if let Some(credential) = credential {
            builder = builder.header(reqwest::header::AUTHORIZATION, credential.header_value());
        }

        builder = match &descriptor.body {
            None => builder,
            Some(Payload::Json(value)) => builder.body(serde_json::to_vec(value)?),
            Some(Payload::Form(pairs)) => builder.form(pairs),
            Some(Payload::Text(text)) => builder.body(text.clone()),
            Some(Payload::Multipart(parts)) => builder.multipart(multipart_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(
                name: "http.response.error",
                status = status.as_u16(),
                "Request failed"
            );
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        decode_payload(descriptor.response_type, &text)
    }
}

fn multipart_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let mut file = reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime)?;
                }
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

/// Decode a success body. Empty bodies decode to `null`.
pub(crate) fn decode_payload(response_type: ResponseType, text: &str) -> Result<Value> {
    let trimmed = text.trim();
    match response_type {
        ResponseType::Json if trimmed.is_empty() => Ok(Value::Null),
        ResponseType::Json => Ok(serde_json::from_str(trimmed)?),
        ResponseType::Jsonp => {
            let inner = strip_padding(trimmed);
            if inner.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(serde_json::from_str(inner)?)
            }
        }
        ResponseType::Xml | ResponseType::Text => Ok(Value::String(text.to_string())),
    }
}

fn strip_padding(text: &str) -> &str {
    if text.starts_with('{') || text.starts_with('[') {
        return text;
    }
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if open < close => text[open + 1..close].trim(),
        _ => text,
    }
}
