//! Application services: one per collection, each a thin layer of rules
//! over the storage ports.
pub mod customer;
pub mod order;
pub mod product;

pub use customer::CustomerService;
pub use order::{OrderService, MAX_RECENT_ORDERS};
pub use product::{ProductService, ReviewSubmission};

use crate::domain::events::DomainEvent;

/// Emits drained aggregate events once the write that produced them is stored.
pub(crate) fn publish(events: Vec<DomainEvent>) {
    for event in events {
        tracing::debug!(?event, "domain event");
    }
}
