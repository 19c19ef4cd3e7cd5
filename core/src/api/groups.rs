//! Groups API.

use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::identifier::path_segment;
use crate::model::Response;
use crate::pipeline::Pipeline;
use crate::value::{CallArguments, Value};

/// Groups API client.
pub struct GroupsApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> GroupsApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Groups in the network; `mine` restricts to the current user's groups,
    /// `reverse` sorts by name descending.
    pub fn all(&self, mine: Option<bool>, reverse: Option<bool>) -> Result<Response> {
        let params = Pipeline::GROUPS.apply(
            CallArguments::new()
                .with("mine", mine)
                .with("reverse", reverse),
        )?;
        self.client.get("/groups", params)
    }

    pub fn find(&self, group: impl Into<Value>) -> Result<Response> {
        self.client.get(&group_path(group)?, Default::default())
    }

    /// Members of a group, 50 per page.
    pub fn members(
        &self,
        group: impl Into<Value>,
        page: Option<u32>,
        reverse: Option<bool>,
    ) -> Result<Response> {
        let path = format!("/users/in_group/{}", path_segment(group)?);
        let params = Pipeline::GROUPS.apply(
            CallArguments::new()
                .with("page", page)
                .with("reverse", reverse),
        )?;
        self.client.get(&path, params)
    }

    pub fn join(&self, group: impl Into<Value>) -> Result<Response> {
        let params = Pipeline::GROUPS.apply(CallArguments::new().with("group_id", group))?;
        self.client.post("/group_memberships", params)
    }

    pub fn leave(&self, group: impl Into<Value>) -> Result<Response> {
        let params = Pipeline::GROUPS.apply(CallArguments::new().with("group_id", group))?;
        self.client.delete("/group_memberships", params)
    }

    pub fn create(&self, name: &str, private: bool) -> Result<Response> {
        let params = Pipeline::GROUPS.apply(
            CallArguments::new()
                .with("name", name)
                .with("private", private),
        )?;
        self.client.post("/groups", params)
    }

    pub fn delete(&self, group: impl Into<Value>) -> Result<Response> {
        let path = group_path(group)?;
        let params = Pipeline::GROUPS.apply(CallArguments::new().with("delete", true))?;
        self.client.delete(&path, params)
    }
}

fn group_path(group: impl Into<Value>) -> Result<String> {
    Ok(format!("/groups/{}", path_segment(group)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::http::HttpMethod;
    use crate::model::Model;
    use crate::test_support::FakeTransport;
    use serde_json::json;

    fn client(transport: &FakeTransport) -> Client<&FakeTransport> {
        Client::new(ClientConfig::default().with_base_url("http://api"), transport)
    }

    #[test]
    fn all_and_find() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        let api = GroupsApi::new(&client);
        api.all(Some(true), None).unwrap();
        api.find(json!({"id": 9})).unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://api/groups.json");
        assert_eq!(requests[0].params.to_query_string(), "mine=true");
        assert_eq!(requests[1].url, "http://api/groups/9.json");
    }

    #[test]
    fn members_lists_users_in_group() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        GroupsApi::new(&client).members(4, Some(2), Some(false)).unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.url, "http://api/users/in_group/4.json");
        assert_eq!(sent.params.to_query_string(), "page=2&reverse=false");
    }

    #[test]
    fn join_and_leave_resolve_group_models() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        let group = Model::new(json!({"id": 17, "full_name": "Engineering"}));
        let api = GroupsApi::new(&client);
        api.join(&group).unwrap();
        api.leave(&group).unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[1].method, HttpMethod::Delete);
        for request in &requests {
            assert_eq!(request.url, "http://api/group_memberships.json");
            assert_eq!(request.params.to_query_string(), "group_id=17");
        }
    }

    #[test]
    fn create_sends_private_flag_as_string() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        GroupsApi::new(&client).create("Rustaceans", false).unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.params.to_query_string(), "name=Rustaceans&private=false");
    }

    #[test]
    fn delete_marks_permanent_deletion() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        GroupsApi::new(&client).delete(6).unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.url, "http://api/groups/6.json");
        assert_eq!(sent.params.to_query_string(), "delete=true");
    }
}
