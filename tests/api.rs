//! End-to-end tests driving the router in-process over the in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shoe_admin_api::api::{self, AppState};
use shoe_admin_api::infrastructure::Stores;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    api::router(AppState::new(Stores::in_memory(), 5))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder.header(CONTENT_TYPE, "application/json").body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

async fn add_customer(app: &Router, email: &str, name: &str) -> String {
    let (status, body) = call(app, Method::POST, "/api/v1/customers", Some(json!({
        "email": email, "name": name, "phone": "0987", "address": "Saigon"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    body["customer"]["id"].as_str().unwrap().to_string()
}

async fn add_product(app: &Router, sku: &str) -> String {
    let (status, body) = call(app, Method::POST, "/api/v1/products", Some(json!({
        "name": format!("Shoe {sku}"), "sku": sku, "price": 1250000,
        "sizeQuantities": {"39": 2, "40": 5, "41": 1},
        "brand": "Ananas", "category": "Sneaker", "description": "Canvas low top",
        "images": ["uploads/1.jpg"]
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["product"]["id"].as_str().unwrap().to_string()
}

async fn place_order(app: &Router, email: &str, total: Value) -> (StatusCode, Value) {
    call(app, Method::POST, "/api/v1/orders", Some(json!({
        "customer": {"email": email, "name": "ignored"},
        "orderItems": [],
        "totalAmount": total
    }))).await
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = call(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn customer_upsert_and_delete() {
    let app = app();
    let id = add_customer(&app, "vy@shop.vn", "Vy").await;
    let again = add_customer(&app, "vy@shop.vn", "Vy Le").await;
    assert_eq!(id, again);

    let (_, list) = call(&app, Method::GET, "/api/v1/customers", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Vy Le");

    let (status, body) = call(&app, Method::POST, "/api/v1/customers", Some(json!({"email": "nope", "name": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::GET, &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn product_catalog() {
    let app = app();
    let id = add_product(&app, "ANS-01").await;

    let (status, product) = call(&app, Method::GET, &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["stock"], 8);
    assert_eq!(product["averageRating"], 0.0);
    assert_eq!(product["sizes"], json!([{"size": 39, "quantity": 2}, {"size": 40, "quantity": 5}, {"size": 41, "quantity": 1}]));

    let (status, body) = call(&app, Method::POST, "/api/v1/products", Some(json!({
        "name": "Copy", "sku": "ANS-01", "price": 1, "sizeQuantities": {}, "brand": "B", "category": "C", "description": "D"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("ANS-01"));

    let (_, listing) = call(&app, Method::GET, "/api/v1/products", None).await;
    assert_eq!(listing["products"][0]["formattedPrice"], "1.250.000\u{a0}₫");
    assert_eq!(listing["products"][0]["price"], 1250000.0);

    let (status, body) = call(&app, Method::PUT, &format!("/api/v1/products/{id}"), Some(json!({"stock": 42, "price": 990000}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["stock"], 42);
    assert_eq!(body["product"]["name"], "Shoe ANS-01");

    let (status, _) = call(&app, Method::PUT, &format!("/api/v1/products/{}", Uuid::new_v4()), Some(json!({"stock": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::GET, "/api/v1/products/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_aggregation() {
    let app = app();
    let product = add_product(&app, "ANS-02").await;
    let reviews_uri = format!("/api/v1/products/{product}/reviews");
    let customer = Uuid::new_v4();

    let (status, first) = call(&app, Method::POST, &reviews_uri, Some(json!({"customer": customer, "name": "Khoa", "rating": 5, "comment": "Great"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(&app, Method::POST, &reviews_uri, Some(json!({"customer": customer, "name": "Khoa", "rating": 1, "comment": "Again"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::POST, &reviews_uri, Some(json!({"customer": Uuid::new_v4(), "name": "Nga", "comment": "No rating"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::POST, &format!("/api/v1/products/{}/reviews", Uuid::new_v4()), Some(json!({"customer": customer, "name": "K", "rating": 3, "comment": "?"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let missing_uri = format!("/api/v1/products/{}/reviews", Uuid::new_v4());
    let (status, body) = call(&app, Method::GET, &missing_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    let (status, _) = call(&app, Method::DELETE, &format!("{missing_uri}/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::POST, &reviews_uri, Some(json!({"customer": Uuid::new_v4(), "name": "Nga", "rating": 2, "comment": "Tight"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, p) = call(&app, Method::GET, &format!("/api/v1/products/{product}"), None).await;
    assert_eq!(p["averageRating"], 3.5);

    let (_, all) = call(&app, Method::GET, "/api/v1/products/reviews", None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|r| r["productId"] == product.as_str() && r["productName"] == "Shoe ANS-02"));

    let (status, body) = call(&app, Method::DELETE, &format!("{reviews_uri}/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["averageRating"], 3.5);

    let (_, list) = call(&app, Method::GET, &reviews_uri, None).await;
    for review in list.as_array().unwrap() {
        let (status, _) = call(&app, Method::DELETE, &format!("{reviews_uri}/{}", review["id"].as_str().unwrap()), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, p) = call(&app, Method::GET, &format!("/api/v1/products/{product}"), None).await;
    assert_eq!(p["averageRating"], 0.0);
    assert!(first["review"]["id"].is_string());
}

#[tokio::test]
async fn order_lifecycle_and_metrics() {
    let app = app();
    let customer = add_customer(&app, "bao@shop.vn", "Bao").await;
    add_customer(&app, "chi@shop.vn", "Chi").await;
    let product = add_product(&app, "ANS-03").await;

    let (status, body) = place_order(&app, "stranger@shop.vn", json!(10)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Customer not found");

    let (status, created) = call(&app, Method::POST, "/api/v1/orders", Some(json!({
        "customer": {"email": "bao@shop.vn"},
        "orderItems": [{"product": product, "quantity": 2, "price": 50}],
        "totalAmount": 100
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["order"]["status"], "Pending");
    let order_id = created["order"]["id"].as_str().unwrap().to_string();

    place_order(&app, "bao@shop.vn", json!(250.50)).await;
    place_order(&app, "chi@shop.vn", json!(0)).await;

    let (_, metrics) = call(&app, Method::GET, "/api/v1/orders/dashboard/metrics", None).await;
    assert_eq!(metrics, json!({"totalOrders": 3, "totalRevenue": 350.5, "totalCustomers": 2}));

    let order_uri = format!("/api/v1/orders/{order_id}");
    for status in ["Delivered", "Pending", "Cancelled"] {
        let (code, body) = call(&app, Method::PUT, &order_uri, Some(json!({"status": status}))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["order"]["status"], status);
        assert_eq!(body["order"]["customer"]["email"], "bao@shop.vn");
        assert_eq!(body["order"]["orderItems"][0]["product"]["name"], "Shoe ANS-03");
    }
    let (code, _) = call(&app, Method::PUT, &order_uri, Some(json!({"status": "Lost"}))).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    let (code, _) = call(&app, Method::PUT, &format!("/api/v1/orders/{}", Uuid::new_v4()), Some(json!({"status": "Shipped"}))).await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    for _ in 0..4 {
        place_order(&app, "chi@shop.vn", json!(1)).await;
    }
    let (_, recent) = call(&app, Method::GET, "/api/v1/orders/recent", None).await;
    let recent = recent.as_array().unwrap();
    assert_eq!(recent.len(), 5);
    let stamps: Vec<&str> = recent.iter().map(|o| o["createdAt"].as_str().unwrap()).collect();
    let parsed: Vec<chrono::DateTime<chrono::Utc>> = stamps.iter().map(|s| s.parse().unwrap()).collect();
    assert!(parsed.windows(2).all(|w| w[0] >= w[1]));

    let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/customers/{customer}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, order) = call(&app, Method::GET, &order_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(order["customer"].is_null());

    let (status, _) = call(&app, Method::DELETE, &order_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &order_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, all) = call(&app, Method::GET, "/api/v1/orders", None).await;
    assert_eq!(all.as_array().unwrap().len(), 6);
}
