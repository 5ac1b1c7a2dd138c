use std::sync::Arc;

use uuid::Uuid;

use crate::domain::aggregates::{Customer, CustomerProfile};
use crate::domain::ports::{CustomerRepository, StoreError, StoreResult};
use crate::services::publish;
use crate::{EcommerceError, Result};

#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    pub async fn list(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Customer> {
        self.customers.find_by_id(id).await?.ok_or(EcommerceError::NotFound("Customer"))
    }

    /// Updates the record with this email in place, or creates one.
    ///
    /// If another request registers the same email between the lookup and
    /// the insert, the lookup runs once more and the profile is applied to
    /// that record.
    pub async fn upsert(&self, profile: CustomerProfile) -> Result<Customer> {
        let mut customer = match self.save_profile(profile.clone()).await {
            Err(StoreError::Duplicate { field: "email", .. }) => {
                tracing::debug!(email = %profile.email, "email registered concurrently, retrying as update");
                self.save_profile(profile).await?
            }
            other => other?,
        };
        publish(customer.take_events());
        tracing::info!(customer_id = %customer.id(), email = %customer.email(), "customer saved");
        Ok(customer)
    }

    async fn save_profile(&self, profile: CustomerProfile) -> StoreResult<Customer> {
        let customer = match self.customers.find_by_email(&profile.email).await? {
            Some(mut existing) => {
                existing.update_profile(profile);
                existing
            }
            None => Customer::register(profile),
        };
        self.customers.save(&customer).await?;
        Ok(customer)
    }

    /// Orders that reference the customer are left untouched.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.customers.delete(id).await? {
            return Err(EcommerceError::NotFound("Customer"));
        }
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(())
    }
}
