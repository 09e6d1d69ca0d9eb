use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{
    CartItem, CategoryStat, CollectionCounts, MenuItem, PaymentRecord, Review, Role, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("duplicate key")]
    DuplicateKey,
    #[error("malformed document: {0}")]
    Decode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("operation timed out")]
    Timeout,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

/// Every read and write the service performs against the document store.
///
/// Each call is atomic per document and nothing more; callers never hold
/// locks across calls. Handlers receive the store as `web::Data<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// Fails with `DuplicateKey` when the email is already registered.
    async fn insert_user(&self, user: &User) -> StoreResult<ObjectId>;
    async fn delete_user(&self, id: &ObjectId) -> StoreResult<u64>;
    async fn set_user_role(&self, id: &ObjectId, role: Role) -> StoreResult<UpdateSummary>;

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>>;
    async fn find_menu_item(&self, id: &ObjectId) -> StoreResult<Option<MenuItem>>;
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;

    async fn list_cart(&self, email: &str) -> StoreResult<Vec<CartItem>>;
    async fn insert_cart_item(&self, item: &CartItem) -> StoreResult<ObjectId>;
    async fn delete_cart_item(&self, id: &ObjectId) -> StoreResult<u64>;
    /// Bulk delete; returns how many of `ids` actually existed.
    async fn delete_cart_items(&self, ids: &[ObjectId]) -> StoreResult<u64>;

    async fn insert_payment(&self, payment: &PaymentRecord) -> StoreResult<ObjectId>;
    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>>;

    /// Cheap approximate document counts.
    async fn collection_counts(&self) -> StoreResult<CollectionCounts>;
    /// Sum of every payment amount, zero when there are none.
    async fn total_revenue(&self) -> StoreResult<f64>;
    /// Purchases joined against the current catalog, grouped by category.
    async fn category_stats(&self) -> StoreResult<Vec<CategoryStat>>;
}
