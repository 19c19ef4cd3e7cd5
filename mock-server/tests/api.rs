use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Message, ACCESS_TOKEN, CLIENT_ID, CLIENT_SECRET, VALID_CODE};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authorized(method: &str, uri: &str, token: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
}

fn get(uri: &str) -> Request<String> {
    authorized("GET", uri, "good").body(String::new()).unwrap()
}

fn form(method: &str, uri: &str, body: &str) -> Request<String> {
    authorized(method, uri, "good")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

// --- authentication ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/v1/messages.json").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_returns_oauth_exception() {
    let resp = app()
        .oneshot(authorized("GET", "/api/v1/messages.json", "expired").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_bytes(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("OAuthException"));
}

#[tokio::test]
async fn throttled_token_returns_429() {
    let resp = app()
        .oneshot(authorized("GET", "/api/v1/users/current.json", "throttled").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

// --- messages ---

#[tokio::test]
async fn list_messages_empty() {
    let resp = app().oneshot(get("/api/v1/messages.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["messages"], serde_json::json!([]));
    assert_eq!(page["meta"]["older_available"], false);
}

#[tokio::test]
async fn create_message_returns_201() {
    let resp = app()
        .oneshot(form("POST", "/api/v1/messages.json", "body=Hello&group_id=7&topic1=rust&topic2=http"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = body_json(resp).await;
    let message: Message = serde_json::from_value(created["messages"][0].clone()).unwrap();
    assert_eq!(message.body.plain, "Hello");
    assert_eq!(message.group_id, Some(7));
    assert_eq!(message.topics, ["rust", "http"]);
    assert_eq!(message.thread_id, message.id);
}

#[tokio::test]
async fn create_message_without_body_returns_400() {
    let resp = app()
        .oneshot(form("POST", "/api/v1/messages.json", "group_id=7"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_message_not_found() {
    let resp = app().oneshot(get("/api/v1/messages/999.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_message_without_suffix_is_not_found() {
    let resp = app().oneshot(get("/api/v1/messages/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_pages_newest_first() {
    use tower::Service;

    let mut app = app().into_service();
    for n in 1..=5 {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(form("POST", "/api/v1/messages.json", &format!("body=m{n}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v1/messages.json?limit=2&older_than=5"))
        .await
        .unwrap();
    let page: serde_json::Value = body_json(resp).await;
    let ids: Vec<u64> = page["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, [4, 3]);
    assert_eq!(page["meta"]["older_available"], true);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v1/messages.json?newer_than=3"))
        .await
        .unwrap();
    let page: serde_json::Value = body_json(resp).await;
    assert_eq!(page["messages"].as_array().unwrap().len(), 2);
    assert_eq!(page["meta"]["older_available"], false);
}

// --- lifecycle ---

#[tokio::test]
async fn message_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form("POST", "/api/v1/messages.json", "body=Walk+dog"))
        .await
        .unwrap();
    let created: serde_json::Value = body_json(resp).await;
    let id = created["messages"][0]["id"].as_u64().unwrap();

    // reply joins the thread
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form("POST", "/api/v1/messages.json", &format!("body=ok&replied_to_id={id}")))
        .await
        .unwrap();
    let reply: serde_json::Value = body_json(resp).await;
    assert_eq!(reply["messages"][0]["thread_id"].as_u64(), Some(id));

    // like
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form("POST", "/api/v1/messages/liked_by/current.json", &format!("message_id={id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/v1/messages/{id}.json")))
        .await
        .unwrap();
    let fetched: Message = body_json(resp).await;
    assert_eq!(fetched.body.plain, "Walk dog");
    assert_eq!(fetched.liked_by, 1);

    // unlike
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            authorized("DELETE", &format!("/api/v1/messages/liked_by/current.json?message_id={id}"), "good")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // delete
    let delete = || {
        authorized("DELETE", &format!("/api/v1/messages/{id}.json"), "good")
            .body(String::new())
            .unwrap()
    };
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app).await.unwrap().call(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- users and groups ---

#[tokio::test]
async fn memberships_show_on_current_user() {
    use tower::Service;

    let mut app = app().into_service();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form("POST", "/api/v1/group_memberships.json", "group_id=9"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v1/users/current.json"))
        .await
        .unwrap();
    let user: serde_json::Value = body_json(resp).await;
    assert_eq!(user["group_memberships"], serde_json::json!([{"id": 9}]));
}

#[tokio::test]
async fn update_user_stores_form_fields() {
    use tower::Service;

    let mut app = app().into_service();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form("PUT", "/api/v1/users/1.json", "job_title=Engineer&education1=MIT%2CBSc"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/v1/users/1.json"))
        .await
        .unwrap();
    let user: serde_json::Value = body_json(resp).await;
    assert_eq!(user["job_title"], "Engineer");
    assert_eq!(user["education1"], "MIT,BSc");
    assert_eq!(user["full_name"], "Mock User");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let resp = app()
        .oneshot(form("PUT", "/api/v1/users/2.json", "job_title=x"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app().oneshot(get("/api/v1/users/2.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- oauth ---

#[tokio::test]
async fn access_token_exchange() {
    let uri = format!(
        "/oauth2/access_token.json?client_id={CLIENT_ID}&client_secret={CLIENT_SECRET}&code={VALID_CODE}"
    );
    let resp = app()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let data: serde_json::Value = body_json(resp).await;
    assert_eq!(data["access_token"]["token"], ACCESS_TOKEN);
}

#[tokio::test]
async fn access_token_rejects_bad_code() {
    let uri = format!("/oauth2/access_token.json?client_id={CLIENT_ID}&client_secret={CLIENT_SECRET}&code=nope");
    let resp = app()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
