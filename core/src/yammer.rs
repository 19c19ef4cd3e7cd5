//! Entry point bundling a configured [`Client`] with the endpoint clients.

use crate::api::{GroupsApi, MessagesApi, RelationshipsApi, ThreadsApi, TopicsApi, UsersApi};
use crate::client::{Client, ClientConfig};
use crate::http::Transport;

/// A Yammer API session for one access token.
#[derive(Debug, Clone)]
pub struct Yammer<T> {
    client: Client<T>,
}

impl<T: Transport> Yammer<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            client: Client::new(config, transport),
        }
    }

    /// The underlying client, for endpoints without a dedicated wrapper.
    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    pub fn messages(&self) -> MessagesApi<'_, T> {
        MessagesApi::new(&self.client)
    }

    pub fn users(&self) -> UsersApi<'_, T> {
        UsersApi::new(&self.client)
    }

    pub fn groups(&self) -> GroupsApi<'_, T> {
        GroupsApi::new(&self.client)
    }

    pub fn topics(&self) -> TopicsApi<'_, T> {
        TopicsApi::new(&self.client)
    }

    pub fn threads(&self) -> ThreadsApi<'_, T> {
        ThreadsApi::new(&self.client)
    }

    pub fn relationships(&self) -> RelationshipsApi<'_, T> {
        RelationshipsApi::new(&self.client)
    }
}

impl<T> From<Client<T>> for Yammer<T> {
    fn from(client: Client<T>) -> Self {
        Self { client }
    }
}

#[cfg(feature = "ureq")]
impl Yammer<crate::transport::UreqTransport> {
    /// Session against the production API over `ureq`.
    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self::new(
            ClientConfig::default().with_access_token(token),
            crate::transport::UreqTransport::new(),
        )
    }
}
