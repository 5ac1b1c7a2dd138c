//! Footwear store back-office API
//!
//! REST service behind the admin console of a shoe shop.
//!
//! ## Features
//! - Product catalog with per-size stock
//! - Product reviews with a maintained average rating
//! - Customer records keyed by email
//! - Order lifecycle and dashboard metrics
//!
//! Storage sits behind the repository traits in [`domain::ports`]; the
//! binary wires either the Postgres adapter or the in-memory one.

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;

use domain::aggregates::{OrderError, ProductError};
use domain::ports::StoreError;
use domain::value_objects::{EmailError, RatingError, SkuError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum EcommerceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EcommerceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<EmailError> for EcommerceError {
    fn from(e: EmailError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<SkuError> for EcommerceError {
    fn from(e: SkuError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<RatingError> for EcommerceError {
    fn from(e: RatingError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<OrderError> for EcommerceError {
    fn from(e: OrderError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<ProductError> for EcommerceError {
    fn from(e: ProductError) -> Self {
        Self::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EcommerceError>;
