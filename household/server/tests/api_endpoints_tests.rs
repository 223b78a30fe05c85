use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use household_server::config::Config;
use household_server::note::Note;
use household_server::web::{AppState, create_app};
use insta::assert_json_snapshot;
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;

/// Builds the full application over a fresh in-memory database.
async fn setup() -> anyhow::Result<Router> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = common::setup_db().await?;
    let config = Config {
        db_path: ":memory:".to_string(),
        static_dir: "./no-frontend-here".to_string(),
        ..Default::default()
    };
    let state = AppState::new(db, config.query_timeout());
    create_app(state, &config)
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send_text(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let text = body.map(|json| json.to_string());
    send_text(app, method, uri, text.as_deref()).await
}

#[tokio::test]
async fn can_walk_task_lifecycle() {
    let app = setup().await.expect("Failed to setup test app");

    let created = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Buy groceries"})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["priority"], "medium");
    assert_eq!(created.body["status"], "todo");
    let id = created.body["id"].as_i64().expect("id is a number");
    assert!(id > 0);

    let rejected = send(&app, Method::POST, "/api/tasks", Some(json!({}))).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let missing = send(&app, Method::GET, "/api/tasks/9999", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({"title": "Updated", "status": "done"})),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["title"], "Updated");
    assert_eq!(updated.body["status"], "done");
    assert_eq!(updated.body["priority"], "medium");

    let deleted = send(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);

    let gone = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_explain_validation_failure() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(&app, Method::POST, "/api/tasks", Some(json!({"title": ""}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_json_snapshot!(response.body, @r#"
    {
      "error": "title is required"
    }
    "#);
}

#[tokio::test]
async fn can_explain_not_found() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(&app, Method::DELETE, "/api/shopping/12", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_json_snapshot!(response.body, @r#"
    {
      "error": "shopping item with id 12 not found"
    }
    "#);
}

#[tokio::test]
async fn can_reject_non_integer_id() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(&app, Method::GET, "/api/notes/abc", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_json_snapshot!(response.body, @r#"
    {
      "error": "invalid id"
    }
    "#);
}

#[tokio::test]
async fn can_reject_malformed_body() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send_text(&app, Method::POST, "/api/projects", Some("{not json")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_json_snapshot!(response.body, @r#"
    {
      "error": "invalid request body"
    }
    "#);
}

#[tokio::test]
async fn can_reject_task_for_unknown_project() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Hang shelves", "projectId": 7})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "project 7 does not exist");
}

#[tokio::test]
async fn can_require_color_on_note_create() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({"title": "Spare key", "content": "Under the mat"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_json_snapshot!(response.body, @r#"
    {
      "error": "color is required"
    }
    "#);
    let listed = send(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn can_require_color_on_note_update() {
    let app = setup().await.expect("Failed to setup test app");
    let created = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({"title": "Spare key", "content": "Under the mat", "color": "yellow"})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["color"], "yellow");
    let id = created.body["id"].as_i64().unwrap();

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/notes/{id}"),
        Some(json!({"title": "Spare key"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "color is required");
}

#[tokio::test]
async fn can_round_trip_note_through_json() {
    let app = setup().await.expect("Failed to setup test app");

    let created = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({"title": "Boiler", "content": "Service in May", "color": "green"})),
    )
    .await;
    let note: Note = serde_json::from_value(created.body.clone()).expect("body is a note");

    assert!(note.id > 0);
    assert_eq!(note.title, "Boiler");
    assert_eq!(note.content, "Service in May");
    assert_eq!(serde_json::to_value(&note).unwrap(), created.body);

    let fetched = send(&app, Method::GET, &format!("/api/notes/{}", note.id), None).await;
    let fetched: Note = serde_json::from_value(fetched.body).unwrap();
    assert_eq!(fetched, note);
}

#[tokio::test]
async fn can_list_every_kind_when_empty() {
    let app = setup().await.expect("Failed to setup test app");

    for path in [
        "/api/tasks",
        "/api/projects",
        "/api/notes",
        "/api/wishlists",
        "/api/shopping",
    ] {
        let response = send(&app, Method::GET, path, None).await;
        assert_eq!(response.status, StatusCode::OK, "GET {path}");
        assert_eq!(response.body, json!([]), "GET {path}");
    }
}

#[tokio::test]
async fn can_list_newest_first_over_http() {
    let app = setup().await.expect("Failed to setup test app");
    for title in ["Bread", "Butter"] {
        send(&app, Method::POST, "/api/shopping", Some(json!({"title": title}))).await;
    }

    let response = send(&app, Method::GET, "/api/shopping", None).await;

    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Butter", "Bread"]);
}

#[tokio::test]
async fn can_mark_every_api_response_as_json() {
    let app = setup().await.expect("Failed to setup test app");
    let created = send(
        &app,
        Method::POST,
        "/api/wishlists",
        Some(json!({"title": "Hammock", "color": "green"})),
    )
    .await;
    let id = created.body["id"].as_i64().unwrap();

    let deleted = send(&app, Method::DELETE, &format!("/api/wishlists/{id}"), None).await;

    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(
        deleted.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn can_tag_responses_with_request_id() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(&app, Method::GET, "/api/projects", None).await;

    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn can_serve_openapi_document() {
    let app = setup().await.expect("Failed to setup test app");

    let response = send(&app, Method::GET, "/api/openapi.json", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["openapi"].is_string());
    assert!(response.body["components"]["schemas"]["Task"].is_object());
    assert!(response.body["components"]["schemas"]["ShoppingItem"].is_object());
}

#[tokio::test]
async fn can_check_health_endpoint() {
    let app = setup().await.expect("Failed to setup test app");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn can_answer_not_found_without_frontend() {
    let app = setup().await.expect("Failed to setup test app");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/some/page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
