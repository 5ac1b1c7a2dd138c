use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiJson, ApiPath, ApiResult, AppState};
use crate::domain::aggregates::{NewProduct, Product, ProductChanges, Review};
use crate::domain::value_objects::{SizeQuantity, Sku};
use crate::domain::views::ReviewEntry;
use crate::services::ReviewSubmission;
use crate::EcommerceError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/reviews", get(list_all_reviews))
        .route("/products/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/products/:id/reviews", get(list_reviews).post(add_review))
        .route("/products/:id/reviews/:review_id", delete(delete_review))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub sku: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Shoe size to quantity, e.g. `{"40": 3, "41": 5}`.
    #[serde(default)]
    pub size_quantities: BTreeMap<u32, u32>,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub customer: Uuid,
    #[serde(default)]
    pub name: String,
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

/// Catalog entry with the price rendered for display.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductListing<'a> {
    #[serde(flatten)]
    product: &'a Product,
    formatted_price: String,
}

/// Renders an amount as Vietnamese đồng, e.g. `1.250.000 ₫`.
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}\u{a0}₫")
}

async fn list_products(State(s): State<AppState>) -> ApiResult<Json<Value>> {
    let products = s.products.list().await?;
    let listings: Vec<ProductListing<'_>> = products
        .iter()
        .map(|product| ProductListing { product, formatted_price: format_vnd(product.price()) })
        .collect();
    Ok(Json(json!({ "products": listings })))
}

async fn get_product(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<Product>> {
    Ok(Json(s.products.get(id).await?))
}

async fn create_product(State(s): State<AppState>, ApiJson(r): ApiJson<CreateProductRequest>) -> ApiResult<(StatusCode, Json<Value>)> {
    r.validate()?;
    let new = NewProduct {
        name: r.name,
        sku: Sku::new(&r.sku).map_err(EcommerceError::from)?,
        price: r.price,
        sizes: r.size_quantities.into_iter().map(|(size, quantity)| SizeQuantity::new(size, quantity)).collect(),
        brand: r.brand,
        category: r.category,
        description: r.description,
        images: r.images,
    };
    let product = s.products.create(new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Product added successfully", "product": product }))))
}

async fn update_product(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>, ApiJson(r): ApiJson<UpdateProductRequest>) -> ApiResult<Json<Value>> {
    r.validate()?;
    let changes = ProductChanges {
        name: r.name,
        sku: r.sku.map(Sku::new).transpose().map_err(EcommerceError::from)?,
        price: r.price,
        category: r.category,
        brand: r.brand,
        stock: r.stock,
        description: r.description,
    };
    let product = s.products.update(id, changes).await?;
    Ok(Json(json!({ "message": "Product updated successfully", "product": product })))
}

async fn delete_product(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<Value>> {
    s.products.delete(id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

async fn list_reviews(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(s.products.reviews(id).await?))
}

async fn add_review(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>, ApiJson(r): ApiJson<AddReviewRequest>) -> ApiResult<(StatusCode, Json<Value>)> {
    let submission = ReviewSubmission { customer: r.customer, name: r.name, rating: r.rating, comment: r.comment };
    let review = s.products.add_review(id, submission).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Review added successfully", "review": review }))))
}

async fn delete_review(State(s): State<AppState>, ApiPath((id, review_id)): ApiPath<(Uuid, Uuid)>) -> ApiResult<Json<Value>> {
    let product = s.products.delete_review(id, review_id).await?;
    Ok(Json(json!({ "message": "Review deleted successfully", "averageRating": product.average_rating() })))
}

async fn list_all_reviews(State(s): State<AppState>) -> ApiResult<Json<Vec<ReviewEntry>>> {
    Ok(Json(s.products.list_all_reviews().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(Decimal::new(1_250_000, 0)), "1.250.000\u{a0}₫");
        assert_eq!(format_vnd(Decimal::new(999, 0)), "999\u{a0}₫");
        assert_eq!(format_vnd(Decimal::new(1000, 0)), "1.000\u{a0}₫");
        assert_eq!(format_vnd(Decimal::new(4995, 1)), "500\u{a0}₫");
        assert_eq!(format_vnd(Decimal::ZERO), "0\u{a0}₫");
        assert_eq!(format_vnd(Decimal::new(-25_000, 0)), "-25.000\u{a0}₫");
    }

    #[test]
    fn test_size_quantities_accept_string_keys() {
        let r: CreateProductRequest = serde_json::from_value(json!({
            "name": "Runner", "sku": "R-1", "price": 1200000, "sizeQuantities": {"41": 2, "40": 3},
            "brand": "B", "category": "C", "description": "D"
        }))
        .unwrap();
        assert_eq!(r.size_quantities.into_iter().collect::<Vec<_>>(), vec![(40, 3), (41, 2)]);
        assert!(r.images.is_empty());
    }
}
