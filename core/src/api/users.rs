//! Users API.

use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::identifier::path_segment;
use crate::model::Response;
use crate::pipeline::Pipeline;
use crate::value::{CallArguments, Record, Value};

/// Sort order for user listings; alphabetical by username when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Messages,
    Followers,
}

impl From<SortBy> for Value {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Messages => Value::from("messages"),
            SortBy::Followers => Value::from("followers"),
        }
    }
}

/// Options for [`UsersApi::all`].
#[derive(Debug, Clone, Default)]
pub struct UserListOptions {
    /// Page of 50 users.
    pub page: Option<u32>,
    /// Only usernames starting with this letter.
    pub letter: Option<String>,
    pub sort_by: Option<SortBy>,
    pub reverse: Option<bool>,
}

/// Options for [`UsersApi::find_current`].
#[derive(Debug, Clone, Default)]
pub struct CurrentUserOptions {
    pub include_group_memberships: Option<bool>,
    pub include_followed_users: Option<bool>,
    pub include_followed_tags: Option<bool>,
}

/// Profile fields accepted when creating or updating a user.
///
/// `education` and `previous_companies` take one record or a sequence of
/// records. Education records need `school`, `degree`, `description`,
/// `start_year` and `end_year`; company records need `company`, `position`,
/// `description`, `start_year` and `end_year`.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    /// Instant messaging details, e.g. `provider` and `username`.
    pub im: Option<Record>,
    pub work_telephone: Option<String>,
    pub work_extension: Option<String>,
    pub mobile_telephone: Option<String>,
    pub significant_other: Option<String>,
    pub kids_names: Option<String>,
    pub interests: Option<String>,
    pub summary: Option<String>,
    pub expertise: Option<String>,
    pub education: Option<Value>,
    pub previous_companies: Option<Value>,
}

impl UserProfile {
    fn arguments(&self) -> CallArguments {
        CallArguments::new()
            .with("full_name", self.full_name.clone())
            .with("job_title", self.job_title.clone())
            .with("location", self.location.clone())
            .with("im", self.im.clone())
            .with("work_telephone", self.work_telephone.clone())
            .with("work_extension", self.work_extension.clone())
            .with("mobile_telephone", self.mobile_telephone.clone())
            .with("significant_other", self.significant_other.clone())
            .with("kids_names", self.kids_names.clone())
            .with("interests", self.interests.clone())
            .with("summary", self.summary.clone())
            .with("expertise", self.expertise.clone())
            .with("education", self.education.clone())
            .with("previous_companies", self.previous_companies.clone())
    }
}

/// Users API client.
pub struct UsersApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> UsersApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Users in the current user's network.
    pub fn all(&self, options: &UserListOptions) -> Result<Response> {
        let params = Pipeline::USERS.apply(
            CallArguments::new()
                .with("page", options.page)
                .with("letter", options.letter.clone())
                .with("sort_by", options.sort_by)
                .with("reverse", options.reverse),
        )?;
        self.client.get("/users", params)
    }

    pub fn in_group(&self, group: impl Into<Value>, page: Option<u32>) -> Result<Response> {
        let path = format!("/users/in_group/{}", path_segment(group)?);
        let params = Pipeline::USERS.apply(CallArguments::new().with("page", page))?;
        self.client.get(&path, params)
    }

    pub fn find_current(&self, options: &CurrentUserOptions) -> Result<Response> {
        let params = Pipeline::USERS.apply(
            CallArguments::new()
                .with("include_group_memberships", options.include_group_memberships)
                .with("include_followed_users", options.include_followed_users)
                .with("include_followed_tags", options.include_followed_tags),
        )?;
        self.client.get("/users/current", params)
    }

    pub fn find(&self, user: impl Into<Value>) -> Result<Response> {
        self.client.get(&user_path(user)?, Default::default())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Response> {
        let params = Pipeline::USERS.apply(CallArguments::new().with("email", email))?;
        self.client.get("/users/by_email", params)
    }

    /// Create a user. Malformed education or company records fail before
    /// anything is sent.
    pub fn create(&self, email: &str, profile: &UserProfile) -> Result<Response> {
        let params = Pipeline::USERS.apply(profile.arguments().with("email", email))?;
        self.client.post("/users", params)
    }

    pub fn update(&self, user: impl Into<Value>, profile: &UserProfile) -> Result<Response> {
        let path = user_path(user)?;
        let params = Pipeline::USERS.apply(profile.arguments())?;
        self.client.put(&path, params)
    }

    pub fn suspend(&self, user: impl Into<Value>) -> Result<Response> {
        self.client.delete(&user_path(user)?, Default::default())
    }

    pub fn delete(&self, user: impl Into<Value>) -> Result<Response> {
        let path = user_path(user)?;
        let params = Pipeline::USERS.apply(CallArguments::new().with("delete", true))?;
        self.client.delete(&path, params)
    }
}

fn user_path(user: impl Into<Value>) -> Result<String> {
    Ok(format!("/users/{}", path_segment(user)?))
}
