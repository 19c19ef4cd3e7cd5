//! Topics API.

use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::identifier::path_segment;
use crate::model::Response;
use crate::value::Value;

pub struct TopicsApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> TopicsApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn find(&self, topic: impl Into<Value>) -> Result<Response> {
        let path = format!("/topics/{}", path_segment(topic)?);
        self.client.get(&path, Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::error::Error;
    use crate::test_support::FakeTransport;

    #[test]
    fn find_by_id() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"id": 3, "name": "rust"}"#);
        let client = Client::new(ClientConfig::default().with_base_url("http://api"), &transport);
        let topic = TopicsApi::new(&client).find(3).unwrap().into_model().unwrap();
        assert_eq!(topic.get("name").unwrap().as_str().unwrap(), "rust");
        assert_eq!(transport.last_request().url, "http://api/topics/3.json");
    }

    #[test]
    fn find_rejects_path_separators() {
        let transport = FakeTransport::new();
        let client = Client::new(ClientConfig::default(), &transport);
        let err = TopicsApi::new(&client).find("a/b").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
        assert!(transport.requests().is_empty());
    }
}
