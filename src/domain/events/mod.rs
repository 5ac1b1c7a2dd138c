//! Domain events
//!
//! Aggregates record what happened to them; services drain the events
//! after a successful write and emit them to the log.
use crate::domain::aggregates::OrderStatus;
use crate::domain::value_objects::{Email, Sku};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Customer(CustomerEvent),
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CustomerEvent {
    Registered { customer_id: Uuid, email: Email },
    ProfileUpdated { customer_id: Uuid },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProductEvent {
    Created { product_id: Uuid, sku: Sku, stock: u32 },
    Updated { product_id: Uuid },
    ReviewAdded { product_id: Uuid, review_id: Uuid, average_rating: f64 },
    ReviewRemoved { product_id: Uuid, review_id: Uuid, average_rating: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Placed { order_id: Uuid, customer_id: Uuid, total: Decimal },
    StatusChanged { order_id: Uuid, from: OrderStatus, to: OrderStatus },
}
