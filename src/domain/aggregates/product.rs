//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use crate::domain::value_objects::{Rating, SizeQuantity, Sku};
use crate::domain::events::{DomainEvent, ProductEvent};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) sku: Sku,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) price: Decimal,
    pub(crate) stock: u32,
    pub(crate) sizes: Vec<SizeQuantity>,
    pub(crate) brand: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) images: Vec<String>,
    pub(crate) reviews: Vec<Review>,
    pub(crate) average_rating: f64,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) events: Vec<DomainEvent>,
}

/// A review embedded in its product document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub customer: Uuid,
    pub name: String,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub sku: Sku,
    pub price: Decimal,
    pub sizes: Vec<SizeQuantity>,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
}

/// Partial update of the scalar fields. `None` leaves a field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<Sku>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: Option<u32>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub customer: Uuid,
    pub name: String,
    pub rating: Rating,
    pub comment: String,
}

impl Product {
    /// Stock starts as the sum of the per-size quantities.
    pub fn create(new: NewProduct) -> Result<Self, ProductError> {
        let stock = new.sizes.iter()
            .try_fold(0u32, |acc, s| acc.checked_add(s.quantity))
            .ok_or(ProductError::StockOverflow)?;
        let id = Uuid::now_v7();
        let mut product = Self {
            id, name: new.name, sku: new.sku.clone(), price: new.price, stock, sizes: new.sizes,
            brand: new.brand, category: new.category, description: new.description, images: new.images,
            reviews: vec![], average_rating: 0.0, created_at: Utc::now(), events: vec![],
        };
        product.raise_event(DomainEvent::Product(ProductEvent::Created { product_id: id, sku: new.sku, stock }));
        Ok(product)
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn sku(&self) -> &Sku { &self.sku }
    pub fn price(&self) -> Decimal { self.price }
    pub fn stock(&self) -> u32 { self.stock }
    pub fn sizes(&self) -> &[SizeQuantity] { &self.sizes }
    pub fn brand(&self) -> &str { &self.brand }
    pub fn category(&self) -> &str { &self.category }
    pub fn description(&self) -> &str { &self.description }
    pub fn images(&self) -> &[String] { &self.images }
    pub fn reviews(&self) -> &[Review] { &self.reviews }
    pub fn average_rating(&self) -> f64 { self.average_rating }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    /// Stock is written as given; `sizes` is not consulted after creation.
    pub fn apply_changes(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name { self.name = name; }
        if let Some(sku) = changes.sku { self.sku = sku; }
        if let Some(price) = changes.price { self.price = price; }
        if let Some(category) = changes.category { self.category = category; }
        if let Some(brand) = changes.brand { self.brand = brand; }
        if let Some(stock) = changes.stock { self.stock = stock; }
        if let Some(description) = changes.description { self.description = description; }
        self.raise_event(DomainEvent::Product(ProductEvent::Updated { product_id: self.id }));
    }

    pub fn has_review_from(&self, customer: Uuid) -> bool {
        self.reviews.iter().any(|r| r.customer == customer)
    }

    pub fn add_review(&mut self, review: NewReview) -> Result<&Review, ProductError> {
        if self.has_review_from(review.customer) { return Err(ProductError::AlreadyReviewed); }
        let review_id = Uuid::now_v7();
        self.reviews.push(Review {
            id: review_id, customer: review.customer, name: review.name, rating: review.rating,
            comment: review.comment, created_at: Utc::now(),
        });
        self.recompute_average_rating();
        self.raise_event(DomainEvent::Product(ProductEvent::ReviewAdded {
            product_id: self.id, review_id, average_rating: self.average_rating,
        }));
        Ok(&self.reviews[self.reviews.len() - 1])
    }

    /// Returns whether a review was removed. The average is recomputed either way.
    pub fn remove_review(&mut self, review_id: Uuid) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| r.id != review_id);
        let removed = self.reviews.len() != before;
        self.recompute_average_rating();
        if removed {
            self.raise_event(DomainEvent::Product(ProductEvent::ReviewRemoved {
                product_id: self.id, review_id, average_rating: self.average_rating,
            }));
        }
        removed
    }

    // Denominator is floored at 1, so an empty review list yields 0.
    fn recompute_average_rating(&mut self) {
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating.value())).sum();
        let count = self.reviews.len().max(1);
        self.average_rating = f64::from(total) / count as f64;
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("Product already reviewed by this customer")]
    AlreadyReviewed,

    #[error("Total stock across sizes exceeds {}", u32::MAX)]
    StockOverflow,
}
