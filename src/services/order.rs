use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::aggregates::{LineItem, Order, OrderStatus};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};
use crate::domain::value_objects::Email;
use crate::domain::views::{DashboardMetrics, ResolvedOrder};
use crate::infrastructure::Stores;
use crate::services::publish;
use crate::{EcommerceError, Result};

/// Upper bound on the dashboard's recent-orders view.
pub const MAX_RECENT_ORDERS: usize = 5;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
    products: Arc<dyn ProductRepository>,
    recent_limit: usize,
}

impl OrderService {
    /// `recent_limit` is clamped to `1..=MAX_RECENT_ORDERS`.
    pub fn new(stores: &Stores, recent_limit: usize) -> Self {
        Self {
            orders: stores.orders.clone(),
            customers: stores.customers.clone(),
            products: stores.products.clone(),
            recent_limit: recent_limit.clamp(1, MAX_RECENT_ORDERS),
        }
    }

    pub async fn list(&self) -> Result<Vec<ResolvedOrder>> {
        let orders = self.orders.list().await?;
        self.resolve(&orders).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ResolvedOrder> {
        let order = self.orders.find_by_id(id).await?.ok_or(EcommerceError::NotFound("Order"))?;
        self.resolve_one(&order).await
    }

    /// The customer must already exist; placing an order never creates one.
    /// Stock is not touched.
    pub async fn create(&self, customer_email: &Email, order_items: Vec<LineItem>, total_amount: Decimal) -> Result<Order> {
        if total_amount.is_sign_negative() || order_items.iter().any(|i| i.price.is_sign_negative()) {
            return Err(EcommerceError::validation("Amounts must not be negative"));
        }
        let customer = self
            .customers
            .find_by_email(customer_email)
            .await?
            .ok_or_else(|| EcommerceError::validation("Customer not found"))?;

        let mut order = Order::place(customer.id(), order_items, total_amount);
        self.orders.insert(&order).await?;
        publish(order.take_events());
        tracing::info!(order_id = %order.id(), customer_id = %customer.id(), total = %total_amount, "order created");
        Ok(order)
    }

    /// Any status can follow any other.
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<ResolvedOrder> {
        let mut order = self.orders.find_by_id(id).await?.ok_or(EcommerceError::NotFound("Order"))?;
        let from = order.set_status(status);
        if !self.orders.update(&order).await? {
            return Err(EcommerceError::NotFound("Order"));
        }
        publish(order.take_events());
        tracing::info!(order_id = %id, %from, to = %status, "order status updated");
        self.resolve_one(&order).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.orders.delete(id).await? {
            return Err(EcommerceError::NotFound("Order"));
        }
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Recomputed from the full collections on every call.
    pub async fn metrics(&self) -> Result<DashboardMetrics> {
        Ok(DashboardMetrics {
            total_orders: self.orders.count().await?,
            total_revenue: self.orders.total_revenue().await?,
            total_customers: self.customers.count().await?,
        })
    }

    pub async fn recent(&self) -> Result<Vec<ResolvedOrder>> {
        let orders = self.orders.recent(self.recent_limit).await?;
        self.resolve(&orders).await
    }

    async fn resolve_one(&self, order: &Order) -> Result<ResolvedOrder> {
        let mut resolved = self.resolve(std::slice::from_ref(order)).await?;
        resolved.pop().ok_or(EcommerceError::NotFound("Order"))
    }

    // Two batched lookups, then an in-memory merge.
    async fn resolve(&self, orders: &[Order]) -> Result<Vec<ResolvedOrder>> {
        if orders.is_empty() {
            return Ok(vec![]);
        }
        let mut customer_ids: Vec<Uuid> = orders.iter().map(Order::customer).collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();
        let mut product_ids: Vec<Uuid> = orders.iter().flat_map(|o| o.order_items().iter().map(|i| i.product)).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let customers: HashMap<_, _> = self.customers.find_by_ids(&customer_ids).await?.into_iter().map(|c| (c.id(), c)).collect();
        let products: HashMap<_, _> = if product_ids.is_empty() {
            HashMap::new()
        } else {
            self.products.find_by_ids(&product_ids).await?.into_iter().map(|p| (p.id(), p)).collect()
        };
        Ok(orders.iter().map(|o| ResolvedOrder::resolve(o, &customers, &products)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{CustomerProfile, NewProduct};
    use crate::domain::value_objects::{SizeQuantity, Sku};
    use crate::services::{CustomerService, ProductService};

    struct Fixture {
        orders: OrderService,
        customers: CustomerService,
        products: ProductService,
    }

    fn fixture() -> Fixture {
        let stores = Stores::in_memory();
        Fixture {
            orders: OrderService::new(&stores, MAX_RECENT_ORDERS),
            customers: CustomerService::new(stores.customers.clone()),
            products: ProductService::new(stores.products.clone()),
        }
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    async fn customer(f: &Fixture, address: &str) -> Uuid {
        f.customers
            .upsert(CustomerProfile { email: email(address), name: "Quang".into(), phone: "0911".into(), address: "Hue".into() })
            .await
            .unwrap()
            .id()
    }

    #[tokio::test]
    async fn test_unknown_customer_is_rejected() {
        let f = fixture();
        let err = f.orders.create(&email("ghost@shop.vn"), vec![], Decimal::new(100, 0)).await.unwrap_err();
        assert!(matches!(err, EcommerceError::Validation(ref m) if m == "Customer not found"));
        assert_eq!(f.orders.metrics().await.unwrap().total_orders, 0);
        assert!(f.customers.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_metrics_sum_exactly() {
        let f = fixture();
        customer(&f, "q@shop.vn").await;
        customer(&f, "r@shop.vn").await;
        for total in [Decimal::new(100, 0), Decimal::new(25050, 2), Decimal::ZERO] {
            f.orders.create(&email("q@shop.vn"), vec![], total).await.unwrap();
        }
        let m = f.orders.metrics().await.unwrap();
        assert_eq!(m.total_orders, 3);
        assert_eq!(m.total_revenue, Decimal::new(35050, 2));
        assert_eq!(m.total_customers, 2);
    }

    #[tokio::test]
    async fn test_metrics_on_empty_store() {
        let m = fixture().orders.metrics().await.unwrap();
        assert_eq!((m.total_orders, m.total_revenue, m.total_customers), (0, Decimal::ZERO, 0));
    }

    #[tokio::test]
    async fn test_status_overwrite_is_unconstrained() {
        let f = fixture();
        customer(&f, "q@shop.vn").await;
        let order = f.orders.create(&email("q@shop.vn"), vec![], Decimal::ONE).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);

        for status in [OrderStatus::Delivered, OrderStatus::Pending, OrderStatus::Cancelled, OrderStatus::Shipped, OrderStatus::Processing] {
            let resolved = f.orders.update_status(order.id(), status).await.unwrap();
            assert_eq!(resolved.status, status);
            assert_eq!(f.orders.get(order.id()).await.unwrap().status, status);
        }

        let missing = f.orders.update_status(Uuid::new_v4(), OrderStatus::Shipped).await;
        assert!(matches!(missing, Err(EcommerceError::NotFound("Order"))));
    }

    #[tokio::test]
    async fn test_recent_is_capped_and_newest_first() {
        let f = fixture();
        customer(&f, "q@shop.vn").await;
        for n in 0..8 {
            f.orders.create(&email("q@shop.vn"), vec![], Decimal::new(n, 0)).await.unwrap();
        }
        let recent = f.orders.recent().await.unwrap();
        assert_eq!(recent.len(), MAX_RECENT_ORDERS);
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(recent[0].total_amount, Decimal::new(7, 0));
    }

    #[tokio::test]
    async fn test_recent_limit_is_clamped() {
        let stores = Stores::in_memory();
        assert_eq!(OrderService::new(&stores, 50).recent_limit, MAX_RECENT_ORDERS);
        assert_eq!(OrderService::new(&stores, 0).recent_limit, 1);
        assert_eq!(OrderService::new(&stores, 3).recent_limit, 3);
    }

    #[tokio::test]
    async fn test_deleted_references_resolve_to_none() {
        let f = fixture();
        let customer_id = customer(&f, "q@shop.vn").await;
        let product = f
            .products
            .create(NewProduct {
                name: "Sandal".into(), sku: Sku::new("SDL-1").unwrap(), price: Decimal::new(300_000, 0),
                sizes: vec![SizeQuantity::new(37, 2)], brand: "B".into(), category: "Summer".into(), description: "D".into(), images: vec![],
            })
            .await
            .unwrap();
        let items = vec![LineItem { product: product.id(), quantity: 2, price: Decimal::new(280_000, 0) }];
        let order = f.orders.create(&email("q@shop.vn"), items, Decimal::new(560_000, 0)).await.unwrap();

        let resolved = f.orders.get(order.id()).await.unwrap();
        assert_eq!(resolved.customer.as_ref().map(|c| c.id), Some(customer_id));
        assert_eq!(resolved.order_items[0].product.as_ref().map(|p| p.price), Some(Decimal::new(300_000, 0)));
        // order creation leaves stock alone
        assert_eq!(f.products.get(product.id()).await.unwrap().stock(), 2);

        f.customers.delete(customer_id).await.unwrap();
        f.products.delete(product.id()).await.unwrap();

        let resolved = f.orders.get(order.id()).await.unwrap();
        assert!(resolved.customer.is_none());
        assert!(resolved.order_items[0].product.is_none());
        assert_eq!(f.orders.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_order() {
        let f = fixture();
        customer(&f, "q@shop.vn").await;
        let order = f.orders.create(&email("q@shop.vn"), vec![], Decimal::ONE).await.unwrap();
        f.orders.delete(order.id()).await.unwrap();
        assert!(matches!(f.orders.get(order.id()).await, Err(EcommerceError::NotFound("Order"))));
        assert!(matches!(f.orders.delete(order.id()).await, Err(EcommerceError::NotFound("Order"))));
        assert_eq!(f.customers.list().await.unwrap().len(), 1);
    }
}
