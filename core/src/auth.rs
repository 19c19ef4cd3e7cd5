//! OAuth2 authorization-code flow.
//!
//! 1. Send the user to [`Authenticator::authorization_url`] to grant access.
//! 2. The service redirects back to `redirect_uri` with a one-time code.
//! 3. Exchange the code with [`Authenticator::fetch_access_token`].

use serde::Deserialize;
use tracing::debug;

use crate::client::{Client, ClientConfig};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::model::Model;
use crate::value::FlatParameters;

pub const DEFAULT_OAUTH_DIALOG_URL: &str = "https://www.yammer.com/dialog/oauth";
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://www.yammer.com/oauth2";

/// Application credentials and OAuth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Page the user visits to authorize the application.
    #[serde(default = "default_dialog_url")]
    pub oauth_dialog_url: String,
    /// Base URL for token exchange requests.
    #[serde(default = "default_base_url")]
    pub oauth_base_url: String,
}

fn default_dialog_url() -> String {
    DEFAULT_OAUTH_DIALOG_URL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_OAUTH_BASE_URL.to_string()
}

impl AuthConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            oauth_dialog_url: default_dialog_url(),
            oauth_base_url: default_base_url(),
        }
    }

    pub fn with_oauth_dialog_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_dialog_url = url.into();
        self
    }

    pub fn with_oauth_base_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_base_url = url.into();
        self
    }
}

/// Authenticates users of an application against the API.
#[derive(Debug, Clone)]
pub struct Authenticator<T> {
    client_id: String,
    client_secret: String,
    oauth_dialog_url: String,
    client: Client<T>,
}

impl<T: Transport> Authenticator<T> {
    pub fn new(config: AuthConfig, transport: T) -> Self {
        let client = Client::new(
            ClientConfig::default().with_base_url(config.oauth_base_url),
            transport,
        );
        Self {
            client_id: config.client_id,
            client_secret: config.client_secret,
            oauth_dialog_url: config.oauth_dialog_url,
            client,
        }
    }

    /// URL the user visits to grant access; they are sent back to
    /// `redirect_uri` with a code.
    pub fn authorization_url(&self, redirect_uri: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .finish();
        format!("{}?{query}", self.oauth_dialog_url)
    }

    /// The full token exchange response, with `user`, `network` and
    /// `access_token` members.
    pub fn fetch_access_data(&self, code: &str) -> Result<Model> {
        let mut params = FlatParameters::new();
        params.insert("client_id", self.client_id.as_str());
        params.insert("client_secret", self.client_secret.as_str());
        params.insert("code", code);
        debug!("exchanging authorization code");
        self.client.get("/access_token", params)?.into_model()
    }

    /// Exchange a code for the access token alone.
    pub fn fetch_access_token(&self, code: &str) -> Result<String> {
        let data = self.fetch_access_data(code)?;
        let token = data
            .get_path(&["access_token", "token"])
            .map_err(|_| Error::UnexpectedResponseFormat)?;
        token
            .as_str()
            .map(str::to_string)
            .map_err(|_| Error::UnexpectedResponseFormat)
    }
}
