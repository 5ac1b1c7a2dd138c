use std::sync::Arc;

use uuid::Uuid;

use crate::domain::aggregates::{NewProduct, NewReview, Product, ProductChanges, Review};
use crate::domain::ports::{ProductRepository, StoreError};
use crate::domain::value_objects::Rating;
use crate::domain::views::ReviewEntry;
use crate::services::publish;
use crate::{EcommerceError, Result};

/// A review as submitted; rating and comment may be missing.
#[derive(Clone, Debug)]
pub struct ReviewSubmission {
    pub customer: Uuid,
    pub name: String,
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

fn duplicate_sku(err: StoreError) -> EcommerceError {
    match err {
        StoreError::Duplicate { field: "sku", value } => EcommerceError::Validation(format!("SKU {value} already exists")),
        other => other.into(),
    }
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product> {
        self.products.find_by_id(id).await?.ok_or(EcommerceError::NotFound("Product"))
    }

    pub async fn create(&self, new: NewProduct) -> Result<Product> {
        if new.price.is_sign_negative() {
            return Err(EcommerceError::validation("Price must not be negative"));
        }
        let mut product = Product::create(new)?;
        self.products.insert(&product).await.map_err(duplicate_sku)?;
        publish(product.take_events());
        tracing::info!(product_id = %product.id(), sku = %product.sku(), stock = product.stock(), "product created");
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Product> {
        if changes.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(EcommerceError::validation("Price must not be negative"));
        }
        let mut product = self.get(id).await?;
        product.apply_changes(changes);
        if !self.products.update_details(&product).await.map_err(duplicate_sku)? {
            return Err(EcommerceError::NotFound("Product"));
        }
        publish(product.take_events());
        tracing::info!(product_id = %id, "product updated");
        // reviews may have changed since the read above
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(EcommerceError::NotFound("Product"));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn reviews(&self, product_id: Uuid) -> Result<Vec<Review>> {
        Ok(self.get(product_id).await?.reviews().to_vec())
    }

    /// Appends the review and refreshes the average rating in the same write.
    pub async fn add_review(&self, product_id: Uuid, submission: ReviewSubmission) -> Result<Review> {
        let mut product = self.get(product_id).await?;
        let comment = submission.comment.filter(|c| !c.trim().is_empty());
        let (Some(rating), Some(comment)) = (submission.rating, comment) else {
            return Err(EcommerceError::validation("Rating and comment are required"));
        };
        let review = NewReview { customer: submission.customer, name: submission.name, rating: Rating::new(rating)?, comment };
        let review = product
            .add_review(review)
            .map_err(EcommerceError::from)?
            .clone();
        if !self.products.update_reviews(&product).await? {
            return Err(EcommerceError::NotFound("Product"));
        }
        publish(product.take_events());
        tracing::info!(product_id = %product_id, review_id = %review.id, average_rating = product.average_rating(), "review added");
        Ok(review)
    }

    /// Removing an unknown review is not an error; the reviews are still rewritten.
    pub async fn delete_review(&self, product_id: Uuid, review_id: Uuid) -> Result<Product> {
        let mut product = self.get(product_id).await?;
        let removed = product.remove_review(review_id);
        if !self.products.update_reviews(&product).await? {
            return Err(EcommerceError::NotFound("Product"));
        }
        publish(product.take_events());
        tracing::info!(product_id = %product_id, review_id = %review_id, removed, average_rating = product.average_rating(), "review deleted");
        Ok(product)
    }

    /// Every review in the catalog, tagged with its product.
    pub async fn list_all_reviews(&self) -> Result<Vec<ReviewEntry>> {
        let products = self.products.list().await?;
        Ok(products
            .iter()
            .flat_map(|p| {
                p.reviews().iter().map(|r| ReviewEntry { product_id: p.id(), product_name: p.name().to_string(), review: r.clone() })
            })
            .collect())
    }
}
