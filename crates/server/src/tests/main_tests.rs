use super::*;
use axum::{
    body::{self, Body},
    http::Request,
};
use serde_json::{json, Value};
use session::{mint_session_token, SessionConfig};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

async fn test_app_with_docs(docs_url: Url) -> Router {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let state = AppState {
        api: ApiContext::new(storage),
        auth_secret: SECRET.to_string(),
        docs: DocsClient::new(docs_url, Duration::from_secs(2)).expect("docs client"),
    };
    build_router(Arc::new(state))
}

async fn test_app() -> Router {
    test_app_with_docs(Url::parse("http://127.0.0.1:9/skill.md").expect("url")).await
}

fn bearer() -> String {
    let token = mint_session_token(&SessionConfig::new(SECRET), "editor").expect("token");
    format!("Bearer {token}")
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer());
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn spawn_docs(status: StatusCode, body: &'static str) -> Url {
    let app = Router::new().route("/skill.md", get(move || async move { (status, body) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    Url::parse(&format!("http://{addr}/skill.md")).expect("url")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let app = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn template_routes_require_bearer_token() {
    let app = test_app().await;

    let request = Request::get("/templates").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).map(|v| v.as_bytes()),
        Some(&b"Bearer"[..])
    );

    let request = Request::get("/templates")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(body["error"]["status"], 401);

    let other = mint_session_token(&SessionConfig::new("other-secret"), "editor").expect("token");
    let request = Request::delete("/templates/abc")
        .header("authorization", format!("Bearer {other}"))
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn template_crud_round_trip_over_http() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        authed(
            "POST",
            "/templates",
            Some(json!({ "title": "Dark theme", "tags": ["css", "dark"], "category": "css_theme" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["title"], "Dark theme");
    assert_eq!(created["data"]["description"], Value::Null);
    let id = created["data"]["id"].as_str().expect("id").to_string();

    let (status, fetched) = send(&app, authed("GET", &format!("/templates/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["tags"], json!(["css", "dark"]));

    let (status, updated) = send(
        &app,
        authed(
            "PUT",
            &format!("/templates/{id}"),
            Some(json!({ "category": null, "description": "Night mode" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["title"], "Dark theme");
    assert_eq!(updated["data"]["category"], Value::Null);
    assert_eq!(updated["data"]["description"], "Night mode");
    assert_eq!(updated["data"]["tags"], json!(["css", "dark"]));

    let (status, listed) = send(&app, authed("GET", "/templates?search=NIGHT&limit=5", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["total"], 1);
    assert_eq!(listed["data"]["limit"], 5);
    assert_eq!(listed["data"]["offset"], 0);
    assert_eq!(listed["data"]["templates"][0]["id"], id.as_str());

    let (status, deleted) = send(&app, authed("DELETE", &format!("/templates/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(deleted["data"]["message"].is_string());

    let (status, _) = send(&app, authed("DELETE", &format!("/templates/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, missing) = send(&app, authed("GET", &format!("/templates/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"]["code"], "not_found");
}

#[tokio::test]
async fn create_without_title_is_bad_request() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        authed("POST", "/templates", Some(json!({ "description": "orphan" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation");
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn malformed_bodies_and_queries_are_validation_errors() {
    let app = test_app().await;

    let request = Request::post("/templates")
        .header("authorization", bearer())
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, authed("GET", "/templates?limit=lots", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation");
}

#[tokio::test]
async fn update_rejects_blank_title_and_unknown_ids() {
    let app = test_app().await;
    let (_, created) = send(
        &app,
        authed("POST", "/templates", Some(json!({ "title": "Keep" }))),
    )
    .await;
    let id = created["data"]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        authed("PUT", &format!("/templates/{id}"), Some(json!({ "title": "" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        authed("PUT", "/templates/unknown", Some(json!({ "title": "New" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn list_reports_total_beyond_page() {
    let app = test_app().await;
    for title in ["one", "two", "three"] {
        send(
            &app,
            authed("POST", "/templates", Some(json!({ "title": title }))),
        )
        .await;
    }

    let (status, body) = send(&app, authed("GET", "/templates?limit=2&offset=2", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["templates"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["templates"][0]["title"], "one");
}

#[tokio::test]
async fn skill_passes_markdown_through_without_auth() {
    let docs_url = spawn_docs(StatusCode::OK, "# Skill\n\nUse the templates API.").await;
    let app = test_app_with_docs(docs_url).await;

    let request = Request::get("/skill").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/markdown; charset=utf-8")
    );
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"# Skill\n\nUse the templates API.");
}

#[tokio::test]
async fn skill_upstream_error_status_is_bad_gateway() {
    let docs_url = spawn_docs(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
    let app = test_app_with_docs(docs_url).await;

    let request = Request::get("/skill").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), SKILL_UNAVAILABLE.as_bytes());
}

#[tokio::test]
async fn skill_unreachable_upstream_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let app = test_app_with_docs(Url::parse(&format!("http://{addr}/skill.md")).expect("url")).await;
    let request = Request::get("/skill").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
