//! Endpoint clients, one per API resource.
//!
//! Each client borrows a [`Client`](crate::Client), converts its call
//! arguments through a [`Pipeline`](crate::Pipeline) and returns the
//! classified [`Response`](crate::Response).

pub mod groups;
pub mod messages;
pub mod relationships;
pub mod threads;
pub mod topics;
pub mod users;

pub use groups::GroupsApi;
pub use messages::{Feed, ListOptions, MessagesApi, NewMessage, Threaded, MAX_TOPICS};
pub use relationships::RelationshipsApi;
pub use threads::ThreadsApi;
pub use topics::TopicsApi;
pub use users::{CurrentUserOptions, SortBy, UserListOptions, UserProfile, UsersApi};
