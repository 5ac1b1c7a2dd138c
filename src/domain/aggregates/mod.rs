//! Aggregates module
pub mod customer;
pub mod product;
pub mod order;

pub use customer::{Customer, CustomerProfile};
pub use product::{NewProduct, NewReview, Product, ProductChanges, ProductError, Review};
pub use order::{LineItem, Order, OrderError, OrderStatus};
