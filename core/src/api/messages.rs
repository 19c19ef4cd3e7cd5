//! Messages API.

use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::identifier::path_segment;
use crate::model::{Model, Response};
use crate::pipeline::Pipeline;
use crate::value::{CallArguments, Record, Value};

/// Most topics a single message may carry.
pub const MAX_TOPICS: usize = 20;

/// How listings group messages into threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threaded {
    /// Only the first message of each thread.
    FirstOnly,
    /// The first and two newest messages of each thread.
    Extended,
}

impl From<Threaded> for Value {
    fn from(threaded: Threaded) -> Self {
        match threaded {
            Threaded::FirstOnly => Value::Bool(true),
            Threaded::Extended => Value::from("extended"),
        }
    }
}

/// Options shared by every message listing.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only messages older than this message (id or message model).
    pub older_than: Option<Value>,
    /// Only messages newer than this message.
    pub newer_than: Option<Value>,
    pub limit: Option<u32>,
    pub threaded: Option<Threaded>,
}

impl ListOptions {
    fn arguments(&self) -> CallArguments {
        CallArguments::new()
            .with("older_than", self.older_than.clone())
            .with("newer_than", self.newer_than.clone())
            .with("limit", self.limit)
            .with("threaded", self.threaded)
    }
}

/// A message listing endpoint.
#[derive(Debug, Clone)]
pub enum Feed {
    /// Public messages in the current user's network.
    All,
    /// The user's feed: top or followed conversations, per their settings.
    MyFeed,
    TopConversations,
    /// Messages from followed users and joined groups.
    FollowedConversations,
    Sent,
    Private,
    Received,
    InGroup(Value),
    InThread(Value),
    FromUser(Value),
}

impl Feed {
    pub fn path(&self) -> Result<String> {
        Ok(match self {
            Feed::All => "/messages".to_string(),
            Feed::MyFeed => "/messages/my_feed".to_string(),
            Feed::TopConversations => "/messages/algo".to_string(),
            Feed::FollowedConversations => "/messages/following".to_string(),
            Feed::Sent => "/messages/sent".to_string(),
            Feed::Private => "/messages/private".to_string(),
            Feed::Received => "/messages/received".to_string(),
            Feed::InGroup(id) => format!("/messages/in_group/{}", path_segment(id.clone())?),
            Feed::InThread(id) => format!("/messages/in_thread/{}", path_segment(id.clone())?),
            Feed::FromUser(id) => format!("/messages/from_user/{}", path_segment(id.clone())?),
        })
    }
}

/// A message to post.
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub body: String,
    /// Post in this group.
    pub group_id: Option<Value>,
    /// Reply to this message.
    pub replied_to_id: Option<Value>,
    /// Send privately to this user.
    pub direct_to_id: Option<Value>,
    /// At most [`MAX_TOPICS`] topics.
    pub topics: Vec<String>,
    /// Network admins only.
    pub broadcast: Option<bool>,
    /// Open graph object to attach. Keys: `url` (required), `title`,
    /// `image`, `description`, `object_type`, `site_name`, `fetch`, `meta`.
    pub open_graph_object: Record,
}

impl NewMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.topics.len() > MAX_TOPICS {
            return Err(Error::TooManyTopics {
                count: self.topics.len(),
                max: MAX_TOPICS,
            });
        }
        let has_url = self
            .open_graph_object
            .get("url")
            .is_some_and(|url| !url.is_absent());
        if !self.open_graph_object.is_empty() && !has_url {
            return Err(Error::InvalidOpenGraphObject);
        }
        Ok(())
    }

    fn arguments(&self) -> CallArguments {
        CallArguments::new()
            .with("body", self.body.as_str())
            .with("group_id", self.group_id.clone())
            .with("replied_to_id", self.replied_to_id.clone())
            .with("direct_to_id", self.direct_to_id.clone())
            .with("topic", self.topics.clone())
            .with("broadcast", self.broadcast)
            .with("og", self.open_graph_object.clone())
    }
}

/// Messages API client.
pub struct MessagesApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> MessagesApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// One page of a listing.
    pub fn list(&self, feed: &Feed, options: &ListOptions) -> Result<Response> {
        let params = Pipeline::STANDARD.apply(options.arguments())?;
        self.client.get(&feed.path()?, params)
    }

    /// Every message of a listing, following `older_than` cursors until the
    /// server reports no older messages or returns an empty page.
    pub fn list_all(&self, feed: &Feed, options: &ListOptions) -> Result<Vec<Model>> {
        let mut options = options.clone();
        let mut messages = Vec::new();
        loop {
            let page = self.list(feed, &options)?.into_model()?;
            let batch = page.get("messages")?.as_array()?;
            let older_available = page
                .try_get("meta")
                .and_then(|meta| meta.try_get("older_available"))
                .and_then(|flag| flag.as_bool().ok())
                .unwrap_or(false);
            debug!(count = batch.len(), older_available, "fetched message page");

            let Some(last) = batch.last() else {
                break;
            };
            options.older_than = Some(Value::from(last));
            messages.extend(batch);
            if !older_available {
                break;
            }
        }
        Ok(messages)
    }

    pub fn all(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::All, options)
    }

    pub fn from_my_feed(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::MyFeed, options)
    }

    pub fn from_top_conversations(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::TopConversations, options)
    }

    pub fn from_followed_conversations(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::FollowedConversations, options)
    }

    pub fn sent(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::Sent, options)
    }

    pub fn private(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::Private, options)
    }

    pub fn received(&self, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::Received, options)
    }

    pub fn from_group(&self, group: impl Into<Value>, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::InGroup(group.into()), options)
    }

    pub fn in_thread(&self, thread: impl Into<Value>, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::InThread(thread.into()), options)
    }

    pub fn from_user(&self, user: impl Into<Value>, options: &ListOptions) -> Result<Response> {
        self.list(&Feed::FromUser(user.into()), options)
    }

    pub fn about_topic(&self, topic: impl Into<Value>) -> Result<Response> {
        let path = format!("/messages/about_topic/{}", path_segment(topic)?);
        self.client.get(&path, Default::default())
    }

    pub fn find(&self, message: impl Into<Value>) -> Result<Response> {
        self.client.get(&message_path(message)?, Default::default())
    }

    /// Post a message. Topics and the open graph object are validated
    /// before anything is sent.
    pub fn create(&self, message: &NewMessage) -> Result<Response> {
        message.validate()?;
        let params = Pipeline::STANDARD.apply(message.arguments())?;
        self.client.post("/messages", params)
    }

    pub fn delete(&self, message: impl Into<Value>) -> Result<Response> {
        self.client.delete(&message_path(message)?, Default::default())
    }

    /// The current user likes the message.
    pub fn like(&self, message: impl Into<Value>) -> Result<Response> {
        let params = Pipeline::STANDARD.apply(message_argument(message))?;
        self.client.post("/messages/liked_by/current", params)
    }

    /// Remove the current user's like.
    pub fn unlike(&self, message: impl Into<Value>) -> Result<Response> {
        let params = Pipeline::STANDARD.apply(message_argument(message))?;
        self.client.delete("/messages/liked_by/current", params)
    }

    /// Email the message to the current user.
    pub fn email(&self, message: impl Into<Value>) -> Result<Response> {
        let params = Pipeline::STANDARD.apply(message_argument(message))?;
        self.client.post("/messages/email", params)
    }
}

fn message_path(message: impl Into<Value>) -> Result<String> {
    Ok(format!("/messages/{}", path_segment(message)?))
}

fn message_argument(message: impl Into<Value>) -> CallArguments {
    CallArguments::new().with("message_id", message)
}
