use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath, ApiResult, AppState};
use crate::domain::aggregates::{LineItem, OrderStatus};
use crate::domain::value_objects::Email;
use crate::domain::views::{DashboardMetrics, ResolvedOrder};
use crate::EcommerceError;

// Fixed paths are registered alongside `/orders/:id`; the router prefers them.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/dashboard/metrics", get(dashboard_metrics))
        .route("/orders/recent", get(recent_orders))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).put(update_order_status).delete(delete_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: OrderCustomer,
    #[serde(default)]
    pub order_items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Only the email is used to find the customer; other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

async fn list_orders(State(s): State<AppState>) -> ApiResult<Json<Vec<ResolvedOrder>>> {
    Ok(Json(s.orders.list().await?))
}

async fn get_order(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<ResolvedOrder>> {
    Ok(Json(s.orders.get(id).await?))
}

async fn create_order(State(s): State<AppState>, ApiJson(r): ApiJson<CreateOrderRequest>) -> ApiResult<(StatusCode, Json<Value>)> {
    let email = Email::parse(&r.customer.email).map_err(EcommerceError::from)?;
    let order = s.orders.create(&email, r.order_items, r.total_amount).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Order created successfully", "order": order }))))
}

async fn update_order_status(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>, ApiJson(r): ApiJson<UpdateStatusRequest>) -> ApiResult<Json<Value>> {
    let status = r.status.parse::<OrderStatus>().map_err(EcommerceError::from)?;
    let order = s.orders.update_status(id, status).await?;
    Ok(Json(json!({ "message": "Order status updated", "order": order })))
}

async fn delete_order(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<Value>> {
    s.orders.delete(id).await?;
    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

async fn dashboard_metrics(State(s): State<AppState>) -> ApiResult<Json<DashboardMetrics>> {
    Ok(Json(s.orders.metrics().await?))
}

async fn recent_orders(State(s): State<AppState>) -> ApiResult<Json<Vec<ResolvedOrder>>> {
    Ok(Json(s.orders.recent().await?))
}
