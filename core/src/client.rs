//! HTTP client for the Yammer REST API.
//!
//! # Design
//! Every call is split in two halves: `build_request` turns a path and flat
//! parameters into an [`HttpRequest`], and `parse_response` classifies an
//! [`HttpResponse`] into a [`Response`] or an [`Error`]. `request` joins the
//! halves with the configured [`Transport`]. The client keeps no state
//! between calls besides its configuration.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::model::{Model, Response};
use crate::value::FlatParameters;

/// Root of the production REST API.
pub const DEFAULT_BASE_URL: &str = "https://www.yammer.com/api/v1";

/// Connection settings for a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Bearer token identifying the current user. Requests are sent
    /// unauthenticated when unset or empty.
    pub access_token: Option<String>,
    /// API root that resource paths are appended to.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Synchronous client that builds, sends and classifies API requests.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    base_url: String,
    access_token: Option<String>,
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.filter(|token| !token.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Describe a request for `path` (e.g. `/messages`) without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: FlatParameters,
    ) -> HttpRequest {
        let headers = match &self.access_token {
            Some(token) => vec![("Authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url: format!("{}{path}.json", self.base_url),
            headers,
            params,
        }
    }

    /// Classify a response by status code.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Response> {
        classify(response)
    }

    /// Build, send and classify one request.
    pub fn request(&self, method: HttpMethod, path: &str, params: FlatParameters) -> Result<Response> {
        let request = self.build_request(method, path, params);
        debug!(
            method = %request.method,
            url = %request.url,
            params = request.params.len(),
            "sending request"
        );
        let response = self.transport.send(&request).map_err(Error::Transport)?;
        debug!(status = response.status, "received response");
        self.parse_response(response)
    }

    /// GET with parameters in the query string.
    pub fn get(&self, path: &str, params: FlatParameters) -> Result<Response> {
        self.request(HttpMethod::Get, path, params)
    }

    /// POST with parameters in the form body.
    pub fn post(&self, path: &str, params: FlatParameters) -> Result<Response> {
        self.request(HttpMethod::Post, path, params)
    }

    /// PUT with parameters in the form body.
    pub fn put(&self, path: &str, params: FlatParameters) -> Result<Response> {
        self.request(HttpMethod::Put, path, params)
    }

    /// DELETE with parameters in the query string.
    pub fn delete(&self, path: &str, params: FlatParameters) -> Result<Response> {
        self.request(HttpMethod::Delete, path, params)
    }
}

/// Map a response onto a success value or an error variant.
fn classify(response: HttpResponse) -> Result<Response> {
    let HttpResponse { status, reason, body } = response;
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(Response::Success);
        }
        return Ok(Response::Model(Model::from_json(&body)?));
    }
    Err(match status {
        400 if body.contains("OAuthException") => {
            warn!(%reason, "access token rejected");
            Error::InvalidAccessToken { reason }
        }
        401 => Error::Unauthorized { reason },
        404 => Error::NotFound { reason },
        429 => {
            warn!(%reason, "rate limit exceeded");
            Error::RateLimitExceeded { reason }
        }
        _ => Error::Response { status, reason },
    })
}
