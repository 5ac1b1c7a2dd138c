//! In-process store.
//!
//! Keeps each collection in a `Vec` behind a `tokio` lock, preserving
//! insertion order. Used by the test suite and when no database is
//! configured.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::aggregates::{Customer, Order, Product};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository, StoreError, StoreResult};
use crate::domain::value_objects::Email;

// Events are transient; stored copies never carry them.
fn stored<T: Clone>(value: &T, strip: impl FnOnce(&mut T)) -> T {
    let mut copy = value.clone();
    strip(&mut copy);
    copy
}

#[derive(Default)]
pub struct MemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        Ok(self.customers.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Customer>> {
        Ok(self.customers.read().await.iter().find(|c| &c.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Customer>> {
        Ok(self.customers.read().await.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn save(&self, customer: &Customer) -> StoreResult<()> {
        let mut customers = self.customers.write().await;
        if customers.iter().any(|c| c.email == customer.email && c.id != customer.id) {
            return Err(StoreError::Duplicate { field: "email", value: customer.email.to_string() });
        }
        let record = stored(customer, |c| c.events.clear());
        match customers.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = record,
            None => customers.push(record),
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut customers = self.customers.write().await;
        let before = customers.len();
        customers.retain(|c| c.id != id);
        Ok(customers.len() != before)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.customers.read().await.len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductRepository {
    fn check_sku(products: &[Product], product: &Product) -> StoreResult<()> {
        if products.iter().any(|p| p.sku == product.sku && p.id != product.id) {
            return Err(StoreError::Duplicate { field: "sku", value: product.sku.to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn insert(&self, product: &Product) -> StoreResult<()> {
        let mut products = self.products.write().await;
        Self::check_sku(&products, product)?;
        products.push(stored(product, |p| p.events.clear()));
        Ok(())
    }

    async fn update_details(&self, product: &Product) -> StoreResult<bool> {
        let mut products = self.products.write().await;
        Self::check_sku(&products, product)?;
        let Some(existing) = products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(false);
        };
        existing.name = product.name.clone();
        existing.sku = product.sku.clone();
        existing.price = product.price;
        existing.category = product.category.clone();
        existing.brand = product.brand.clone();
        existing.stock = product.stock;
        existing.description = product.description.clone();
        Ok(true)
    }

    async fn update_reviews(&self, product: &Product) -> StoreResult<bool> {
        let mut products = self.products.write().await;
        let Some(existing) = products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(false);
        };
        existing.reviews = product.reviews.clone();
        existing.average_rating = product.average_rating;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn list(&self) -> StoreResult<Vec<Order>> {
        Ok(self.orders.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        Ok(self.orders.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn insert(&self, order: &Order) -> StoreResult<()> {
        self.orders.write().await.push(stored(order, |o| o.events.clear()));
        Ok(())
    }

    async fn update(&self, order: &Order) -> StoreResult<bool> {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                *existing = stored(order, |o| o.events.clear());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() != before)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.orders.read().await.len() as u64)
    }

    async fn total_revenue(&self) -> StoreResult<Decimal> {
        Ok(self.orders.read().await.iter().map(|o| o.total_amount).sum())
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Order>> {
        let mut orders = self.orders.read().await.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        orders.truncate(limit);
        Ok(orders)
    }
}
