//! In-memory stand-in for the Yammer REST API.
//!
//! Serves the subset of `/api/v1` the client integration tests exercise,
//! plus the OAuth token exchange under `/oauth2`. API routes require a
//! bearer token; two reserved tokens trigger the service's error replies:
//! `expired` answers 400 with an `OAuthException` body and `throttled`
//! answers 429.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Messages per page when the request sets no `limit`.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Authorization code exchanged for [`ACCESS_TOKEN`] at
/// `/oauth2/access_token.json`.
pub const VALID_CODE: &str = "valid-code";
pub const ACCESS_TOKEN: &str = "mock-token";
pub const CLIENT_ID: &str = "mock-client";
pub const CLIENT_SECRET: &str = "mock-secret";

/// Id of the user every valid token authenticates as.
pub const CURRENT_USER_ID: u64 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub plain: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender_id: u64,
    pub thread_id: u64,
    pub replied_to_id: Option<u64>,
    pub group_id: Option<u64>,
    pub body: MessageBody,
    pub topics: Vec<String>,
    pub liked_by: u32,
}

#[derive(Debug, Default)]
pub struct Db {
    next_id: u64,
    messages: BTreeMap<u64, Message>,
    likes: BTreeSet<u64>,
    memberships: BTreeSet<u64>,
    /// Profile fields set on the current user by `PUT /users/{id}`.
    profile: BTreeMap<String, String>,
}

pub type SharedDb = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db: SharedDb = Arc::default();
    let api = Router::new()
        .route("/messages.json", get(list_messages).post(create_message))
        .route("/messages/{file}", get(get_message).delete(delete_message))
        .route(
            "/messages/liked_by/current.json",
            post(like_message).delete(unlike_message),
        )
        .route("/users/current.json", get(current_user))
        .route("/users/{file}", get(get_user).put(update_user))
        .route("/group_memberships.json", post(join_group).delete(leave_group))
        .route_layer(middleware::from_fn(require_bearer));
    Router::new()
        .nest("/api/v1", api)
        .route("/oauth2/access_token.json", get(access_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock API listening");
    }
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let rejection = match token {
        None => Some(StatusCode::UNAUTHORIZED.into_response()),
        Some("expired") => Some(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"type": "OAuthException", "message": "Token expired"}})),
            )
                .into_response(),
        ),
        Some("throttled") => Some(StatusCode::TOO_MANY_REQUESTS.into_response()),
        Some(_) => None,
    };
    match rejection {
        Some(response) => response,
        None => next.run(request).await,
    }
}

/// Parse `{id}.json` path captures.
fn resource_id(file: &str) -> Result<u64, StatusCode> {
    file.strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub older_than: Option<u64>,
    pub newer_than: Option<u64>,
    pub limit: Option<usize>,
}

/// Newest first. `older_available` reports whether messages older than the
/// page remain.
async fn list_messages(
    State(db): State<SharedDb>,
    Query(query): Query<ListQuery>,
) -> Json<serde_json::Value> {
    let db = db.read().await;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let matching: Vec<&Message> = db
        .messages
        .values()
        .rev()
        .filter(|m| query.older_than.map_or(true, |id| m.id < id))
        .filter(|m| query.newer_than.map_or(true, |id| m.id > id))
        .collect();
    let older_available = matching.len() > limit;
    let page: Vec<&Message> = matching.into_iter().take(limit).collect();
    debug!(count = page.len(), older_available, "listing messages");
    Json(json!({
        "messages": page,
        "meta": {"older_available": older_available},
    }))
}

/// Posted form fields; numbered `topicN` keys carry the topics.
async fn create_message(
    State(db): State<SharedDb>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let body = form
        .get("body")
        .filter(|body| !body.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let number = |key: &str| -> Result<Option<u64>, StatusCode> {
        form.get(key)
            .map(|value| value.parse().map_err(|_| StatusCode::BAD_REQUEST))
            .transpose()
    };
    let replied_to_id = number("replied_to_id")?;
    let group_id = number("group_id")?;
    let topics = (1..)
        .map_while(|n| form.get(&format!("topic{n}")).cloned())
        .collect();

    let mut db = db.write().await;
    db.next_id += 1;
    let id = db.next_id;
    let thread_id = match replied_to_id {
        Some(parent) => db.messages.get(&parent).map(|m| m.thread_id).ok_or(StatusCode::NOT_FOUND)?,
        None => id,
    };
    let message = Message {
        id,
        sender_id: CURRENT_USER_ID,
        thread_id,
        replied_to_id,
        group_id,
        body: MessageBody { plain: body.clone() },
        topics,
        liked_by: 0,
    };
    db.messages.insert(id, message.clone());
    Ok((StatusCode::CREATED, Json(json!({"messages": [message]}))))
}

async fn get_message(
    State(db): State<SharedDb>,
    Path(file): Path<String>,
) -> Result<Json<Message>, StatusCode> {
    let id = resource_id(&file)?;
    let db = db.read().await;
    db.messages.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_message(
    State(db): State<SharedDb>,
    Path(file): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let id = resource_id(&file)?;
    let mut db = db.write().await;
    db.likes.remove(&id);
    db.messages.remove(&id).map(|_| StatusCode::OK).ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
pub struct MessageTarget {
    pub message_id: u64,
}

async fn like_message(
    State(db): State<SharedDb>,
    Form(target): Form<MessageTarget>,
) -> Result<StatusCode, StatusCode> {
    set_like(&db, target.message_id, true).await
}

async fn unlike_message(
    State(db): State<SharedDb>,
    Query(target): Query<MessageTarget>,
) -> Result<StatusCode, StatusCode> {
    set_like(&db, target.message_id, false).await
}

async fn set_like(db: &SharedDb, id: u64, liked: bool) -> Result<StatusCode, StatusCode> {
    let mut guard = db.write().await;
    let db = &mut *guard;
    let message = db.messages.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if liked {
        if db.likes.insert(id) {
            message.liked_by += 1;
        }
        Ok(StatusCode::CREATED)
    } else {
        if db.likes.remove(&id) {
            message.liked_by -= 1;
        }
        Ok(StatusCode::OK)
    }
}

fn user_json(db: &Db) -> serde_json::Value {
    let mut user = json!({
        "id": CURRENT_USER_ID,
        "name": "mock.user",
        "full_name": "Mock User",
    });
    for (field, value) in &db.profile {
        user[field.as_str()] = json!(value);
    }
    let groups: Vec<_> = db.memberships.iter().map(|id| json!({"id": id})).collect();
    user["group_memberships"] = json!(groups);
    user
}

async fn current_user(State(db): State<SharedDb>) -> Json<serde_json::Value> {
    Json(user_json(&*db.read().await))
}

/// Only the current user exists.
async fn get_user(
    State(db): State<SharedDb>,
    Path(file): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if resource_id(&file)? != CURRENT_USER_ID {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(user_json(&*db.read().await)))
}

/// Form fields are stored as-is, so formatted `educationN` strings can be
/// read back.
async fn update_user(
    State(db): State<SharedDb>,
    Path(file): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if resource_id(&file)? != CURRENT_USER_ID {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut db = db.write().await;
    debug!(fields = form.len(), "updating user profile");
    db.profile.extend(form);
    Ok(Json(user_json(&db)))
}

#[derive(Debug, Deserialize)]
pub struct GroupTarget {
    pub group_id: u64,
}

async fn join_group(
    State(db): State<SharedDb>,
    Form(target): Form<GroupTarget>,
) -> StatusCode {
    db.write().await.memberships.insert(target.group_id);
    StatusCode::CREATED
}

async fn leave_group(
    State(db): State<SharedDb>,
    Query(target): Query<GroupTarget>,
) -> StatusCode {
    db.write().await.memberships.remove(&target.group_id);
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub client_id: String,
    pub client_secret: String,
    pub code: String,
}

async fn access_token(Query(query): Query<TokenQuery>) -> Result<Json<serde_json::Value>, StatusCode> {
    if query.client_id != CLIENT_ID || query.client_secret != CLIENT_SECRET || query.code != VALID_CODE {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "access_token": {"token": ACCESS_TOKEN, "user_id": CURRENT_USER_ID},
        "user": {"id": CURRENT_USER_ID, "name": "mock.user"},
        "network": {"id": 100, "name": "Mock Network"},
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_strips_json_suffix() {
        assert_eq!(resource_id("42.json"), Ok(42));
        assert_eq!(resource_id("42"), Err(StatusCode::NOT_FOUND));
        assert_eq!(resource_id("abc.json"), Err(StatusCode::NOT_FOUND));
    }

    #[test]
    fn message_serializes_with_plain_body() {
        let message = Message {
            id: 3,
            sender_id: 1,
            thread_id: 3,
            replied_to_id: None,
            group_id: Some(7),
            body: MessageBody { plain: "hi".to_string() },
            topics: vec!["rust".to_string()],
            liked_by: 0,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["body"]["plain"], "hi");
        assert_eq!(json["group_id"], 7);
        assert!(json["replied_to_id"].is_null());
    }

    #[test]
    fn list_query_fields_are_optional() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert!(query.older_than.is_none() && query.limit.is_none());
    }
}
