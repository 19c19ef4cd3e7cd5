//! Threads API.

use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::identifier::path_segment;
use crate::model::Response;
use crate::value::Value;

pub struct ThreadsApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> ThreadsApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Thread details; the thread id is the id of its first message.
    pub fn find(&self, thread: impl Into<Value>) -> Result<Response> {
        let path = format!("/threads/{}", path_segment(thread)?);
        self.client.get(&path, Default::default())
    }
}
