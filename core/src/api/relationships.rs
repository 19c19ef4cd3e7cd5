//! Org chart relationships API.

use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::model::Response;
use crate::pipeline::Pipeline;
use crate::value::{CallArguments, Value};

pub struct RelationshipsApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> RelationshipsApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Superiors, subordinates and colleagues of `user`, or of the current
    /// user when `None`.
    pub fn all(&self, user: Option<Value>) -> Result<Response> {
        let params = Pipeline::STANDARD.apply(CallArguments::new().with("user_id", user))?;
        self.client.get("/relationships", params)
    }
}
