//! Storage adapters behind the domain ports.
pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};

/// One handle per collection, shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn CustomerRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(memory::MemoryCustomerRepository::default()),
            products: Arc::new(memory::MemoryProductRepository::default()),
            orders: Arc::new(memory::MemoryOrderRepository::default()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            customers: Arc::new(postgres::PgCustomerRepository::new(pool.clone())),
            products: Arc::new(postgres::PgProductRepository::new(pool.clone())),
            orders: Arc::new(postgres::PgOrderRepository::new(pool)),
        }
    }
}

/// Connects and applies pending migrations.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
