//! Read models assembled for responses.
//!
//! References held by orders and reviews are resolved against the current
//! customer and product records at read time; nothing here is persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::aggregates::{Customer, Order, OrderStatus, Product, Review};
use crate::domain::value_objects::Email;

/// Contact fields of the customer an order points at.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}

impl From<&Customer> for CustomerSummary {
    fn from(c: &Customer) -> Self {
        Self { id: c.id(), name: c.name().to_string(), email: c.email().clone(), phone: c.phone().to_string(), address: c.address().to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self { id: p.id(), name: p.name().to_string(), price: p.price() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedLineItem {
    /// `None` once the product has been deleted.
    pub product: Option<ProductSummary>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOrder {
    pub id: Uuid,
    /// `None` once the customer has been deleted.
    pub customer: Option<CustomerSummary>,
    pub order_items: Vec<ResolvedLineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl ResolvedOrder {
    pub fn resolve(order: &Order, customers: &HashMap<Uuid, Customer>, products: &HashMap<Uuid, Product>) -> Self {
        Self {
            id: order.id(),
            customer: customers.get(&order.customer()).map(CustomerSummary::from),
            order_items: order
                .order_items()
                .iter()
                .map(|item| ResolvedLineItem {
                    product: products.get(&item.product).map(ProductSummary::from),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            total_amount: order.total_amount(),
            status: order.status(),
            created_at: order.created_at(),
        }
    }
}

/// A review listed outside its product, tagged with where it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(flatten)]
    pub review: Review,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_customers: u64,
}
