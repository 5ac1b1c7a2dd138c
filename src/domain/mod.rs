//! Domain layer: aggregates, value objects, events, read models and storage ports.
pub mod aggregates;
pub mod events;
pub mod ports;
pub mod value_objects;
pub mod views;
