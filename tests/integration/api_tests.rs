//! API integration tests against the in-memory book store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use books_server::{
    api,
    models::Book,
    repository::{BookStore, MemoryBookStore},
    services::Services,
    validation::ValidationPolicy,
    AppConfig, AppState,
};

const TEST_ISBN: &str = "0691161518";

fn test_book() -> Book {
    Book {
        isbn: TEST_ISBN.to_string(),
        amazon_url: "http://a.co/eobPtX2".to_string(),
        author: "Matthew Lane".to_string(),
        language: "english".to_string(),
        pages: 201,
        publisher: "Harvard University Press".to_string(),
        title: "The Best Book in the World".to_string(),
        year: 2007,
    }
}

/// Router over a store seeded with the test book
async fn app() -> Router {
    let store = MemoryBookStore::new();
    store.create(test_book()).await.expect("Failed to seed store");

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(Arc::new(store), ValidationPolicy::default())),
    };
    api::create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

fn new_book() -> Value {
    json!({
        "isbn": "12345678",
        "amazon_url": "https://google.com",
        "author": "tester",
        "language": "english",
        "pages": 23,
        "publisher": "me",
        "title": "test test",
        "year": 2000
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_list_books() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [test_book()] }));
}

#[tokio::test]
async fn test_get_book() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, &format!("/books/{}", TEST_ISBN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], TEST_ISBN);
}

#[tokio::test]
async fn test_get_missing_book() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/books/12345", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_create_book() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/books", Some(new_book())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"], new_book());

    let (status, body) = send(&app, Method::GET, "/books/12345678", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], new_book());
}

#[tokio::test]
async fn test_create_without_required_fields() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/books", Some(json!({ "year": 1997 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let violations = body["violations"].as_array().expect("No violations in response");
    assert_eq!(violations.len(), 7);
    assert!(violations.iter().all(|v| v["rule"] == "required"));
    assert!(body["message"].as_str().unwrap().contains("isbn is required"));

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_duplicate_isbn() {
    let app = app().await;
    let mut duplicate = new_book();
    duplicate["isbn"] = json!(TEST_ISBN);

    let (status, body) = send(&app, Method::POST, "/books", Some(duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", TEST_ISBN), None).await;
    assert_eq!(body["book"]["title"], "The Best Book in the World");
}

#[tokio::test]
async fn test_malformed_json() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"isbn\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_replace_book() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", TEST_ISBN),
        Some(json!({
            "amazon_url": "http://a.co/eobPtX2",
            "author": "Moi",
            "language": "french",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
            "year": 2000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["year"], 2000);
    assert_eq!(body["book"]["isbn"], TEST_ISBN);
}

#[tokio::test]
async fn test_bad_replace() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", TEST_ISBN),
        Some(json!({
            "author": 12,
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["amazon_url", "author", "year"]);

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", TEST_ISBN), None).await;
    assert_eq!(body["book"]["author"], "Matthew Lane");
}

#[tokio::test]
async fn test_replace_missing_book() {
    let app = app().await;
    let mut body = new_book();
    body.as_object_mut().unwrap().remove("isbn");

    let (status, _) = send(&app, Method::PUT, "/books/12345678", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/books/12345678", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book() {
    let app = app().await;
    let uri = format!("/books/{}", TEST_ISBN);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
