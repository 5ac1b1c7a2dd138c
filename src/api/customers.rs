use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiJson, ApiPath, ApiResult, AppState};
use crate::domain::aggregates::{Customer, CustomerProfile};
use crate::domain::value_objects::Email;
use crate::EcommerceError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(upsert_customer))
        .route("/customers/:id", get(get_customer).delete(delete_customer))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertCustomerRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

async fn list_customers(State(s): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(s.customers.list().await?))
}

async fn get_customer(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<Customer>> {
    Ok(Json(s.customers.get(id).await?))
}

async fn upsert_customer(State(s): State<AppState>, ApiJson(r): ApiJson<UpsertCustomerRequest>) -> ApiResult<Json<Value>> {
    r.validate()?;
    let email = Email::parse(&r.email).map_err(EcommerceError::from)?;
    let customer = s.customers.upsert(CustomerProfile { email, name: r.name, phone: r.phone, address: r.address }).await?;
    Ok(Json(json!({ "message": "Customer saved successfully", "customer": customer })))
}

async fn delete_customer(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<Value>> {
    s.customers.delete(id).await?;
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}
