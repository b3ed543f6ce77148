//! Request/response round-trips through the router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use storefront_commerce::{schema, StoragePolicy};
use storefront_db::Db;
use storefront_server::{create_app, AppState};
use tower::ServiceExt;

fn app() -> (Router, Db) {
    let db = Db::open_in_memory().unwrap();
    schema::migrate(&db).unwrap();
    schema::seed_sample_data(&db).unwrap();
    (create_app(AppState::new(db.clone(), StoragePolicy::default())), db)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value, axum::http::HeaderMap) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body, headers)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_database() {
    let (app, _) = app();
    let (status, body, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn products_list_in_id_order_with_nullable_rating() {
    let (app, _) = app();
    let (status, body, _) = send(&app, get("/api/products")).await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 5);
    assert_eq!(products[0]["id"], 1);
    assert_eq!(products[0]["rating"], 4.5);
    assert_eq!(products[0]["is_available"], true);
    // Wireless Earbuds have no reviews.
    assert!(products[3]["rating"].is_null());
}

#[tokio::test]
async fn submit_review_returns_created_with_aggregate() {
    let (app, _) = app();
    let request = post_json(
        "/api/reviews",
        json!({
            "product_id": "4",
            "user_name": "Margaret",
            "rating": 4,
            "comment": "Battery easily lasts a full day"
        }),
    );
    let (status, body, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["review_id"].as_i64().unwrap() > 0);
    assert_eq!(body["average_rating"], 4.0);
    assert_eq!(body["total_reviews"], 1);
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let (app, _) = app();
    let cases = [
        (json!({"product_id": 0, "user_name": "A", "rating": 4, "comment": "Long enough text"}), "invalid_product"),
        (json!({"product_id": 1, "user_name": "A", "rating": 6, "comment": "Long enough text"}), "invalid_rating"),
        (json!({"product_id": 1, "user_name": "A", "rating": 4, "comment": "too short"}), "comment_too_short"),
        (json!({"product_id": 1, "user_name": " ", "rating": 4, "comment": "Long enough text"}), "missing_name"),
        (json!({"product_id": 0, "user_name": null, "rating": 4, "comment": null}), "invalid_product"),
        (json!({"product_id": 1, "user_name": "A", "rating": 4, "comment": null}), "comment_too_short"),
        (json!({"product_id": 1, "user_name": null, "rating": 4, "comment": "Long enough text"}), "missing_name"),
    ];

    for (payload, code) in cases {
        let (status, body, _) = send(&app, post_json("/api/reviews", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{code}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], code);
    }
}

#[tokio::test]
async fn unknown_product_is_404() {
    let (app, _) = app();
    let request = post_json(
        "/api/reviews",
        json!({"product_id": 999999, "user_name": "A", "rating": 3, "comment": "Never arrived at all"}),
    );
    let (status, body, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "product_not_found");
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (app, _) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/reviews")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed_request");
}

#[tokio::test]
async fn listing_by_query_and_path() {
    let (app, _) = app();

    let (status, body, _) = send(&app, get("/api/reviews?product_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_reviews"], 2);
    assert_eq!(body["data"]["average_rating"], 4.5);
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 2);

    let (status, path_body, _) = send(&app, get("/api/products/1/reviews")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(path_body, body);
}

#[tokio::test]
async fn listing_without_reviews_has_null_average() {
    let (app, _) = app();
    let (status, body, _) = send(&app, get("/api/reviews?product_id=4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_reviews"], 0);
    assert!(body["data"]["average_rating"].is_null());
}

#[tokio::test]
async fn listing_requires_positive_product_id() {
    let (app, _) = app();
    for uri in ["/api/reviews", "/api/reviews?product_id=0", "/api/reviews?product_id=abc", "/api/products/-1/reviews"] {
        let (status, body, _) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "invalid_product_id");
    }
}

#[tokio::test]
async fn bad_query_string_uses_error_envelope() {
    let (app, _) = app();
    let (status, body, headers) = send(&app, get("/api/reviews?product_id=1&product_id=2")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "malformed_request");
}

#[tokio::test]
async fn stale_aggregate_is_accepted_with_warning() {
    let (app, db) = app();
    db.execute_batch(
        "CREATE TRIGGER freeze_rating BEFORE UPDATE OF rating ON products
         BEGIN SELECT RAISE(ABORT, 'rating is frozen'); END;",
    )
    .unwrap();

    let request = post_json(
        "/api/reviews",
        json!({"product_id": 2, "user_name": "Ken", "rating": 1, "comment": "Filter started rattling"}),
    );
    let (status, body, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["success"], true);
    assert!(body["review_id"].as_i64().is_some());
    assert_eq!(body["warning"]["error"], "aggregate_update_failed");
    // No internal detail leaks to the client.
    assert!(!body.to_string().contains("frozen"));
}

#[tokio::test]
async fn contact_form() {
    let (app, _) = app();
    let request = post_json(
        "/api/contact",
        json!({"name": "Ada", "email": "ada@example.com", "subject": "", "message": "Do you ship abroad?"}),
    );
    let (status, body, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message_id"], 1);

    let request = post_json(
        "/api/contact",
        json!({"name": "Ada", "email": "nope", "message": "Hello"}),
    );
    let (status, body, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_email");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let (app, _) = app();

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-123")
        .body(Body::empty())
        .unwrap();
    let (_, _, headers) = send(&app, request).await;
    assert_eq!(headers["x-request-id"], "trace-123");

    let (_, _, headers) = send(&app, get("/health")).await;
    assert_eq!(headers["x-request-id"].len(), 36);
}
