//! Storage ports.
//!
//! Each collection is a set of documents: embedded lists (sizes, reviews,
//! line items) are read together with their parent. Product writes are split
//! by field group so a detail edit and a review change never overwrite each
//! other.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::{Customer, Order, Product};
use crate::domain::value_objects::Email;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Customer>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Customer>>;
    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Customer>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Customer>>;
    /// Inserts the record, or overwrites the one with the same id.
    async fn save(&self, customer: &Customer) -> StoreResult<()>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
    async fn count(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Product>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>>;
    /// Fails with [`StoreError::Duplicate`] when the SKU is taken.
    async fn insert(&self, product: &Product) -> StoreResult<()>;
    /// Writes name, SKU, price, category, brand, stock and description only.
    /// Returns `false` if no such product exists; fails with
    /// [`StoreError::Duplicate`] when the SKU is taken.
    async fn update_details(&self, product: &Product) -> StoreResult<bool>;
    /// Writes the review list and average rating only.
    async fn update_reviews(&self, product: &Product) -> StoreResult<bool>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders in creation order.
    async fn list(&self) -> StoreResult<Vec<Order>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>>;
    async fn insert(&self, order: &Order) -> StoreResult<()>;
    async fn update(&self, order: &Order) -> StoreResult<bool>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
    async fn count(&self) -> StoreResult<u64>;
    /// Sum of `total_amount` over every stored order; zero when there are none.
    async fn total_revenue(&self) -> StoreResult<Decimal>;
    /// Newest first, at most `limit` orders. Equal timestamps are broken by
    /// id, highest first.
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Order>>;
}
