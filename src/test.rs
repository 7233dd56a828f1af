use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    error::ErrorVerbosity, extractor::json::MAX_BODY_BYTES, server, state::ApiState,
    store::memory::MemoryBookStore,
};

fn test_app(verbosity: ErrorVerbosity) -> Router {
    let state = ApiState::new(
        verbosity,
        "test".to_string(),
        Arc::new(MemoryBookStore::default()),
    );

    server::app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<String>) -> Response {
    let builder = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("infallible service");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();

    let json = match bytes.is_empty() {
        true => Value::Null,
        false => serde_json::from_slice(&bytes).expect("json body"),
    };

    Response {
        status,
        headers,
        raw: bytes.to_vec(),
        json,
    }
}

struct Response {
    status: StatusCode,
    headers: HeaderMap,
    raw: Vec<u8>,
    json: Value,
}

fn dune() -> Value {
    json!({
        "title": "Dune",
        "author": "Herbert",
        "published": 1965,
        "pages": 412,
        "genres": ["scifi"],
        "rating": 4.8,
        "isbn": "0441013597"
    })
}

async fn create_dune(app: &Router) -> i64 {
    let response = send(app, Method::POST, "/v1/books", Some(dune().to_string())).await;

    assert_eq!(response.status, StatusCode::CREATED);

    response.json["book"]["id"].as_i64().expect("assigned id")
}

#[tokio::test]
async fn create_then_get_round_trips_every_field() {
    let app = test_app(ErrorVerbosity::Message);

    let created = send(&app, Method::POST, "/v1/books", Some(dune().to_string())).await;

    assert_eq!(created.status, StatusCode::CREATED);

    let book = &created.json["book"];
    let id = book["id"].as_i64().expect("assigned id");
    assert!(id > 0);

    let mut expected = dune();
    expected["id"] = json!(id);
    assert_eq!(book, &expected);

    assert_eq!(
        created.headers.get(header::LOCATION).map(|v| v.as_bytes()),
        Some(format!("/v1/books/{id}").as_bytes())
    );

    let fetched = send(&app, Method::GET, &format!("/v1/books/{id}"), None).await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json["book"], expected);
}

#[tokio::test]
async fn success_envelopes_have_exactly_one_key_and_a_trailing_newline() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(&app, Method::GET, &format!("/v1/books/{id}"), None).await;

    assert_eq!(
        response
            .headers
            .get(header::CONTENT_TYPE)
            .map(|v| v.as_bytes()),
        Some(b"application/json".as_ref())
    );
    assert_eq!(response.json.as_object().expect("object").len(), 1);
    assert!(response.raw.ends_with(b"}\n"));
}

#[tokio::test]
async fn list_returns_all_books_under_the_books_key() {
    let app = test_app(ErrorVerbosity::Message);
    create_dune(&app).await;
    create_dune(&app).await;

    let response = send(&app, Method::GET, "/v1/books", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["books"].as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn update_with_a_single_field_changes_exactly_that_field() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(json!({"rating": 4.9}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);

    let mut expected = dune();
    expected["id"] = json!(id);
    expected["rating"] = json!(4.9);
    assert_eq!(response.json["book"], expected);
}

#[tokio::test]
async fn update_overwrites_with_explicit_empty_string() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(json!({"author": ""}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["book"]["author"], json!(""));
    assert_eq!(response.json["book"]["title"], json!("Dune"));
}

#[tokio::test]
async fn update_with_null_leaves_the_field_untouched() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(json!({"title": null}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["book"]["title"], json!("Dune"));
}

#[tokio::test]
async fn update_with_empty_genres_cannot_clear_them() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(json!({"genres": []}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["book"]["genres"], json!(["scifi"]));
}

#[tokio::test]
async fn update_with_null_genres_leaves_them_untouched() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(json!({"genres": null}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["book"]["genres"], json!(["scifi"]));
}

#[tokio::test]
async fn update_of_a_missing_book_is_404_even_with_a_bad_body() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(
        &app,
        Method::PUT,
        "/v1/books/999",
        Some(r#"{"title":"#.to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_non_empty_genres_replaces_wholesale() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(json!({"genres": ["classic", "epic"]}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["book"]["genres"], json!(["classic", "epic"]));
}

#[tokio::test]
async fn delete_answers_the_message_envelope_then_get_is_404() {
    let app = test_app(ErrorVerbosity::Message);
    let id = create_dune(&app).await;

    let deleted = send(&app, Method::DELETE, &format!("/v1/books/{id}"), None).await;

    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json["message"], json!("book successfully deleted"));

    let fetched = send(&app, Method::GET, &format!("/v1/books/{id}"), None).await;

    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_missing_book_is_404() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(&app, Method::GET, "/v1/books/42", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_identifier_is_400() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(&app, Method::DELETE, "/v1/books/abc", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_body_field_is_400() {
    let app = test_app(ErrorVerbosity::Full);

    let response = send(
        &app,
        Method::POST,
        "/v1/books",
        Some(json!({"title": "A", "publisher": "B"}).to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    // `reason` is serde-skipped, so the struct variant serializes empty.
    assert_eq!(
        response.json["error"]["body_error_type"],
        json!({"UnknownField": {}})
    );
}

#[tokio::test]
async fn concatenated_json_values_are_400() {
    let app = test_app(ErrorVerbosity::Full);
    let id = create_dune(&app).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/v1/books/{id}"),
        Some(r#"{"title":"A"}{"title":"B"}"#.to_string()),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json["error"]["body_error_type"],
        json!("TrailingData")
    );
}

#[tokio::test]
async fn oversized_body_is_rejected_before_parsing() {
    let app = test_app(ErrorVerbosity::Full);

    // Valid JSON if it were ever parsed; the cap has to fire first.
    let body = json!({"title": "a".repeat(MAX_BODY_BYTES)}).to_string();

    let response = send(&app, Method::POST, "/v1/books", Some(body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"]["body_error_type"], json!("TooLarge"));
}

#[tokio::test]
async fn unsupported_method_on_a_known_route_is_405() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(&app, Method::PATCH, "/v1/books", None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(&app, Method::GET, "/v1/authors", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn options_short_circuits_with_200_and_no_body() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(&app, Method::OPTIONS, "/v1/books", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.raw.is_empty());
}

#[tokio::test]
async fn cross_origin_requests_are_allowed_for_any_origin() {
    let app = test_app(ErrorVerbosity::Message);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/v1/books")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .expect("request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("infallible service");

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.as_bytes()),
        Some(b"*".as_ref())
    );
}

#[tokio::test]
async fn healthcheck_reports_available() {
    let app = test_app(ErrorVerbosity::Message);

    let response = send(&app, Method::GET, "/v1/healthcheck", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["status"], json!("available"));
    assert_eq!(response.json["environment"], json!("test"));
}
