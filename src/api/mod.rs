//! HTTP surface, mounted under `/api/v1`.

pub mod customers;
pub mod error;
pub mod orders;
pub mod products;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::infrastructure::Stores;
use crate::services::{CustomerService, OrderService, ProductService};

pub use error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl AppState {
    pub fn new(stores: Stores, recent_orders_limit: usize) -> Self {
        Self {
            customers: CustomerService::new(stores.customers.clone()),
            products: ProductService::new(stores.products.clone()),
            orders: OrderService::new(&stores, recent_orders_limit),
        }
    }
}

/// JSON body whose rejection renders as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejection renders as an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(customers::routes())
        .merge(products::routes())
        .merge(orders::routes());

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "shoe-admin-api"})) }))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Only `origin` may call the API when given; any origin otherwise.
pub fn cors(origin: Option<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);
    match origin {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}
