//! HTTP surface driven through the router with `oneshot`

mod common;

use axum::Router;
use axum::body::Body;
use common::*;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use market_server::api::build_app;
use market_server::auth::hash_password;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn checkout(user_id: &str) -> Value {
    json!({
        "userId": user_id,
        "items": [{ "productId": "P1", "quantity": 2, "price": 100 }],
        "name": "Alice Nguyen",
        "address": "12 Garden Street",
        "phone": "0900000001",
        "paymentMethod": "cod",
        "fee": 15,
        "total_price": 215
    })
}

#[tokio::test]
async fn test_checkout_and_buckets() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "api1@example.com").await;
    let app = build_app(state.clone());

    let (status, order) = call(&app, Method::POST, "/api/sellers", Some(checkout(&buyer.id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert!(is_order_code(order["code"].as_str().unwrap()));
    let order_id = order["id"].as_str().unwrap().to_string();

    let (_, second) = call(&app, Method::POST, "/api/sellers", Some(checkout(&buyer.id))).await;
    let second_id = second["id"].as_str().unwrap().to_string();
    let (status, _) = call(&app, Method::PATCH, &format!("/api/orders/{second_id}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, buckets) = call(&app, Method::GET, &format!("/api/seller/{}", buyer.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let mut total = 0;
    for bucket in ["pending", "resolved", "processing", "delivered", "cancelled"] {
        total += buckets[bucket].as_array().unwrap().len();
    }
    assert_eq!(total, 2);
    assert_eq!(buckets["pending"][0]["id"], order_id.as_str());
    assert_eq!(buckets["cancelled"][0]["id"], second_id.as_str());

    let (status, detail) = call(&app, Method::GET, &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["items"][0]["product_id"], "P1");
}

#[tokio::test]
async fn test_checkout_validation_errors() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "api2@example.com").await;
    let app = build_app(state);

    let mut body = checkout(&buyer.id);
    body["items"] = json!([]);
    let (status, err) = call(&app, Method::POST, "/api/sellers", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 4007);

    let mut body = checkout(&buyer.id);
    body.as_object_mut().unwrap().remove("paymentMethod");
    let (status, err) = call(&app, Method::POST, "/api/sellers", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["details"]["field"], "paymentMethod");

    let mut body = checkout(&buyer.id);
    body["address"] = json!("x".repeat(501));
    body["name"] = json!("y".repeat(201));
    let (status, err) = call(&app, Method::POST, "/api/sellers", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 2);
    assert_eq!(err["details"]["fields"], json!(["address", "name"]));

    let (status, err) = call(
        &app,
        Method::POST,
        "/api/notices",
        Some(json!({
            "userId": buyer.id,
            "orderId": buyer.id,
            "title": "t".repeat(201),
            "message": "ok",
            "type": "pending"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["details"]["fields"], json!(["title"]));

    let mut body = checkout(&buyer.id);
    body["fee"] = json!(-1);
    let (status, err) = call(&app, Method::POST, "/api/sellers", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 2);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sellers")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shipper_routes() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "api3@example.com").await;
    let shipper = create_shipper(&state, "api-s@example.com").await;
    let order = place_order(&state, &buyer.id).await;
    let app = build_app(state);

    let (status, awaiting) = call(&app, Method::GET, "/api/shipper", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(awaiting.as_array().unwrap().len(), 1);

    // legacy `orderID` spelling
    let body = json!({ "id": shipper.id, "orderID": order.id });
    let (status, outcome) = call(&app, Method::PATCH, "/api/shipper_accept", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["order"]["status"], "processing");
    assert_eq!(outcome["assignment"]["sellers"], order.id.as_str());
    assert_eq!(outcome["notice"]["type"], "processing");

    let (status, err) = call(&app, Method::PATCH, "/api/shipper_accept", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 4010);

    let body = json!({ "id": shipper.id, "orderId": order.id });
    let (status, _) = call(&app, Method::PATCH, "/api/shipper_complete", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, buckets) = call(&app, Method::GET, &format!("/api/shipper_status/{}", shipper.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(buckets["delivered"].as_array().unwrap().len(), 1);
    assert!(buckets["processing"].as_array().unwrap().is_empty());

    let body = json!({ "id": shipper.id });
    let (status, err) = call(&app, Method::PATCH, "/api/shipper_cancel", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 7);
}

#[tokio::test]
async fn test_lookup_errors_map_to_status_codes() {
    let state = test_state().await;
    let app = build_app(state);
    let missing = shared::util::new_record_key();

    let (status, err) = call(&app, Method::GET, &format!("/api/orders/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 4001);

    let (status, _) = call(&app, Method::GET, "/api/orders/nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) = call(&app, Method::PATCH, &format!("/notice/read/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 5001);

    let (status, err) = call(&app, Method::GET, &format!("/api/conversations/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 6002);
}

#[tokio::test]
async fn test_notice_routes() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "api4@example.com").await;
    let order = place_order(&state, &buyer.id).await;
    let app = build_app(state);

    let body = json!({
        "userId": buyer.id,
        "orderId": order.id,
        "title": "Packed",
        "message": "Your order is packed",
        "type": "pending"
    });
    let (status, notice) = call(&app, Method::POST, "/api/notices", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(notice["is_read"], false);
    let id = notice["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let (status, read) = call(&app, Method::PATCH, &format!("/notice/read/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(read["is_read"], true);
    }

    let (status, list) = call(&app, Method::GET, &format!("/notice/{}", buyer.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_routes() {
    let state = test_state().await;
    let hash = hash_password("s3cret-pass").unwrap();
    create_buyer_with_hash(&state, "login@example.com", &hash).await;
    let app = build_app(state);

    let (status, profile) = call(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "email": "Login@Example.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "login@example.com");
    assert!(profile.get("password_hash").is_none());

    let (status, err) = call(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "email": "login@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["code"], 1002);

    let (status, _) = call(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "email": "not-an-email", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let state = test_state().await;
    let app = build_app(state);
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
