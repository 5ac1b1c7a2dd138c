//! Value Objects for the catalog and customer records

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Customer email, the natural identity of a customer record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(value: impl AsRef<str>) -> Result<Self, EmailError> {
        let value = value.as_ref().trim();
        if value.is_empty() { return Err(EmailError::Empty); }
        if !validator::validate_email(value) { return Err(EmailError::Malformed(value.to_string())); }
        Ok(Self(value.to_string()))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Error)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,
    #[error("Invalid email address: {0}")]
    Malformed(String),
}

/// SKU (Stock Keeping Unit) value object
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub const MAX_LEN: usize = 50;

    pub fn new(value: impl AsRef<str>) -> Result<Self, SkuError> {
        let value = value.as_ref().trim();
        if value.is_empty() { return Err(SkuError::Empty); }
        if value.len() > Self::MAX_LEN { return Err(SkuError::TooLong); }
        Ok(Self(value.to_string()))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Error)]
pub enum SkuError {
    #[error("SKU is required")]
    Empty,
    #[error("SKU must be at most {} characters", Sku::MAX_LEN)]
    TooLong,
}

/// Review score on a 1..=5 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        if !(Self::MIN..=Self::MAX).contains(&value) { return Err(RatingError::OutOfRange(value)); }
        Ok(Self(value))
    }
    pub fn value(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self { r.0 }
}

#[derive(Debug, Clone, Error)]
pub enum RatingError {
    #[error("Rating must be between {} and {}, got {0}", Rating::MIN, Rating::MAX)]
    OutOfRange(u8),
}

/// Stock held for one shoe size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    pub size: u32,
    pub quantity: u32,
}

impl SizeQuantity {
    pub fn new(size: u32, quantity: u32) -> Self { Self { size, quantity } }
}
