//! Postgres adapter.
//!
//! Scalar fields live in columns; embedded lists (sizes, reviews, line
//! items) are JSONB so each write is a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::aggregates::{Customer, LineItem, Order, OrderStatus, Product, Review};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository, StoreError, StoreResult};
use crate::domain::value_objects::{Email, SizeQuantity, Sku};

fn unique_violation(err: sqlx::Error, field: &'static str, value: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate { field, value: value.to_string() },
        _ => StoreError::Database(err),
    }
}

fn to_u32(value: i64, column: &str) -> StoreResult<u32> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {value}")))
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

// =============================================================================
// Customers
// =============================================================================

#[derive(sqlx::FromRow)]
struct CustomerRow { id: Uuid, email: String, name: String, phone: String, address: String, created_at: DateTime<Utc> }

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;
    fn try_from(r: CustomerRow) -> StoreResult<Self> {
        let email = Email::parse(&r.email).map_err(|e| StoreError::Corrupt(format!("customer {}: {e}", r.id)))?;
        Ok(Customer { id: r.id, email, name: r.name, phone: r.phone, address: r.address, created_at: r.created_at, events: vec![] })
    }
}

fn customers(rows: Vec<CustomerRow>) -> StoreResult<Vec<Customer>> {
    rows.into_iter().map(Customer::try_from).collect()
}

pub struct PgCustomerRepository { pool: PgPool }

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers ORDER BY created_at").fetch_all(&self.pool).await?;
        customers(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = $1").bind(id)
            .fetch_optional(&self.pool).await?.map(Customer::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<Customer>> {
        sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE email = $1").bind(email.as_str())
            .fetch_optional(&self.pool).await?.map(Customer::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = ANY($1)").bind(ids).fetch_all(&self.pool).await?;
        customers(rows)
    }

    async fn save(&self, c: &Customer) -> StoreResult<()> {
        sqlx::query("INSERT INTO customers (id, email, name, phone, address, created_at) VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, phone = EXCLUDED.phone, address = EXCLUDED.address")
            .bind(c.id).bind(c.email.as_str()).bind(&c.name).bind(&c.phone).bind(&c.address).bind(c.created_at)
            .execute(&self.pool).await.map_err(|e| unique_violation(e, "email", c.email.as_str()))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM customers WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers").fetch_one(&self.pool).await?;
        Ok(to_count(n))
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid, name: String, sku: String, price: Decimal, stock: i64, sizes: Json<Vec<SizeQuantity>>,
    brand: String, category: String, description: String, images: Vec<String>, reviews: Json<Vec<Review>>,
    average_rating: f64, created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;
    fn try_from(r: ProductRow) -> StoreResult<Self> {
        let sku = Sku::new(&r.sku).map_err(|e| StoreError::Corrupt(format!("product {}: {e}", r.id)))?;
        Ok(Product {
            id: r.id, name: r.name, sku, price: r.price, stock: to_u32(r.stock, "stock")?, sizes: r.sizes.0,
            brand: r.brand, category: r.category, description: r.description, images: r.images,
            reviews: r.reviews.0, average_rating: r.average_rating, created_at: r.created_at, events: vec![],
        })
    }
}

fn products(rows: Vec<ProductRow>) -> StoreResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

pub struct PgProductRepository { pool: PgPool }

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY created_at").fetch_all(&self.pool).await?;
        products(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1").bind(id)
            .fetch_optional(&self.pool).await?.map(Product::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ANY($1)").bind(ids).fetch_all(&self.pool).await?;
        products(rows)
    }

    async fn insert(&self, p: &Product) -> StoreResult<()> {
        sqlx::query("INSERT INTO products (id, name, sku, price, stock, sizes, brand, category, description, images, reviews, average_rating, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)")
            .bind(p.id).bind(&p.name).bind(p.sku.as_str()).bind(p.price).bind(i64::from(p.stock)).bind(Json(&p.sizes))
            .bind(&p.brand).bind(&p.category).bind(&p.description).bind(&p.images).bind(Json(&p.reviews))
            .bind(p.average_rating).bind(p.created_at)
            .execute(&self.pool).await.map_err(|e| unique_violation(e, "sku", p.sku.as_str()))?;
        Ok(())
    }

    async fn update_details(&self, p: &Product) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE products SET name = $2, sku = $3, price = $4, category = $5, brand = $6, stock = $7, description = $8 WHERE id = $1")
            .bind(p.id).bind(&p.name).bind(p.sku.as_str()).bind(p.price).bind(&p.category).bind(&p.brand)
            .bind(i64::from(p.stock)).bind(&p.description)
            .execute(&self.pool).await.map_err(|e| unique_violation(e, "sku", p.sku.as_str()))?;
        Ok(done.rows_affected() > 0)
    }

    async fn update_reviews(&self, p: &Product) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE products SET reviews = $2, average_rating = $3 WHERE id = $1")
            .bind(p.id).bind(Json(&p.reviews)).bind(p.average_rating)
            .execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(sqlx::FromRow)]
struct OrderRow { id: Uuid, customer_id: Uuid, order_items: Json<Vec<LineItem>>, total_amount: Decimal, status: String, created_at: DateTime<Utc> }

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;
    fn try_from(r: OrderRow) -> StoreResult<Self> {
        let status: OrderStatus = r.status.parse().map_err(|e| StoreError::Corrupt(format!("order {}: {e}", r.id)))?;
        Ok(Order { id: r.id, customer: r.customer_id, order_items: r.order_items.0, total_amount: r.total_amount, status, created_at: r.created_at, events: vec![] })
    }
}

fn orders(rows: Vec<OrderRow>) -> StoreResult<Vec<Order>> {
    rows.into_iter().map(Order::try_from).collect()
}

// Ids are v7, so `id DESC` keeps same-timestamp orders newest first.
const RECENT_ORDERS: &str = "SELECT * FROM orders ORDER BY created_at DESC, id DESC LIMIT $1";

pub struct PgOrderRepository { pool: PgPool }

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn list(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at").fetch_all(&self.pool).await?;
        orders(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1").bind(id)
            .fetch_optional(&self.pool).await?.map(Order::try_from).transpose()
    }

    async fn insert(&self, o: &Order) -> StoreResult<()> {
        sqlx::query("INSERT INTO orders (id, customer_id, order_items, total_amount, status, created_at) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(o.id).bind(o.customer).bind(Json(&o.order_items)).bind(o.total_amount).bind(o.status.as_str()).bind(o.created_at)
            .execute(&self.pool).await?;
        Ok(())
    }

    async fn update(&self, o: &Order) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE orders SET order_items = $2, total_amount = $3, status = $4 WHERE id = $1")
            .bind(o.id).bind(Json(&o.order_items)).bind(o.total_amount).bind(o.status.as_str())
            .execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders").fetch_one(&self.pool).await?;
        Ok(to_count(n))
    }

    async fn total_revenue(&self) -> StoreResult<Decimal> {
        let (sum,): (Decimal,) = sqlx::query_as("SELECT COALESCE(SUM(total_amount), 0) FROM orders").fetch_one(&self.pool).await?;
        Ok(sum)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Order>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, OrderRow>(RECENT_ORDERS).bind(limit).fetch_all(&self.pool).await?;
        orders(rows)
    }
}
