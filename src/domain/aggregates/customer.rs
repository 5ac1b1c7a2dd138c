//! Customer Aggregate

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use crate::domain::events::{CustomerEvent, DomainEvent};
use crate::domain::value_objects::Email;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub(crate) id: Uuid,
    pub(crate) email: Email,
    pub(crate) name: String,
    pub(crate) phone: String,
    pub(crate) address: String,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) events: Vec<DomainEvent>,
}

/// Mutable contact fields plus the email that keys the record.
#[derive(Clone, Debug)]
pub struct CustomerProfile {
    pub email: Email,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Customer {
    pub fn register(profile: CustomerProfile) -> Self {
        let id = Uuid::now_v7();
        let mut customer = Self {
            id, email: profile.email.clone(), name: profile.name, phone: profile.phone,
            address: profile.address, created_at: Utc::now(), events: vec![],
        };
        customer.raise_event(DomainEvent::Customer(CustomerEvent::Registered { customer_id: id, email: profile.email }));
        customer
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn email(&self) -> &Email { &self.email }
    pub fn name(&self) -> &str { &self.name }
    pub fn phone(&self) -> &str { &self.phone }
    pub fn address(&self) -> &str { &self.address }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    /// Overwrites the contact fields; the email is the lookup key and stays put.
    pub fn update_profile(&mut self, profile: CustomerProfile) {
        self.name = profile.name;
        self.phone = profile.phone;
        self.address = profile.address;
        self.raise_event(DomainEvent::Customer(CustomerEvent::ProfileUpdated { customer_id: self.id }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}
