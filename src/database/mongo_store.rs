use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::results::InsertOneResult;
use serde::Deserialize;

use super::{MongoDB, Store, StoreError, StoreResult, UpdateSummary};
use super::{CARTS, MENU, PAYMENTS, REVIEWS, USERS};
use crate::models::{
    CartItem, CategoryStat, CollectionCounts, MenuItem, PaymentRecord, Review, Role, User,
};
use crate::services::analytics_service;

const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

fn inserted_object_id(result: InsertOneResult) -> StoreResult<ObjectId> {
    match result.inserted_id {
        Bson::ObjectId(id) => Ok(id),
        other => Err(StoreError::Decode(format!(
            "expected ObjectId as inserted id, got {}",
            other
        ))),
    }
}

#[derive(Deserialize)]
struct RevenueRow {
    #[serde(rename = "totalRevenue")]
    total_revenue: f64,
}

#[async_trait]
impl Store for MongoDB {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let cursor = self.collection::<User>(USERS).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<ObjectId> {
        match self.collection::<User>(USERS).insert_one(user).await {
            Ok(result) => inserted_object_id(result),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_user(&self, id: &ObjectId) -> StoreResult<u64> {
        let result = self
            .collection::<Document>(USERS)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn set_user_role(&self, id: &ObjectId, role: Role) -> StoreResult<UpdateSummary> {
        let role = mongodb::bson::to_bson(&role).map_err(|e| StoreError::Decode(e.to_string()))?;
        let result = self
            .collection::<Document>(USERS)
            .update_one(doc! { "_id": id }, doc! { "$set": { "role": role } })
            .await?;

        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        let cursor = self.collection::<MenuItem>(MENU).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_menu_item(&self, id: &ObjectId) -> StoreResult<Option<MenuItem>> {
        Ok(self
            .collection::<MenuItem>(MENU)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let cursor = self.collection::<Review>(REVIEWS).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_cart(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        let cursor = self
            .collection::<CartItem>(CARTS)
            .find(doc! { "email": email })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_cart_item(&self, item: &CartItem) -> StoreResult<ObjectId> {
        let result = self.collection::<CartItem>(CARTS).insert_one(item).await?;
        inserted_object_id(result)
    }

    async fn delete_cart_item(&self, id: &ObjectId) -> StoreResult<u64> {
        let result = self
            .collection::<Document>(CARTS)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_cart_items(&self, ids: &[ObjectId]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection::<Document>(CARTS)
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn insert_payment(&self, payment: &PaymentRecord) -> StoreResult<ObjectId> {
        let result = self
            .collection::<PaymentRecord>(PAYMENTS)
            .insert_one(payment)
            .await?;
        inserted_object_id(result)
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        let cursor = self
            .collection::<PaymentRecord>(PAYMENTS)
            .find(doc! { "email": email })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn collection_counts(&self) -> StoreResult<CollectionCounts> {
        let users = self
            .collection::<Document>(USERS)
            .estimated_document_count()
            .await?;
        let menu_items = self
            .collection::<Document>(MENU)
            .estimated_document_count()
            .await?;
        let payments = self
            .collection::<Document>(PAYMENTS)
            .estimated_document_count()
            .await?;

        Ok(CollectionCounts {
            users,
            menu_items,
            payments,
        })
    }

    async fn total_revenue(&self) -> StoreResult<f64> {
        let mut cursor = self
            .collection::<Document>(PAYMENTS)
            .aggregate(analytics_service::revenue_pipeline())
            .await?;

        match cursor.try_next().await? {
            Some(row) => {
                let row: RevenueRow = mongodb::bson::from_document(row)
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(row.total_revenue)
            }
            None => Ok(0.0),
        }
    }

    async fn category_stats(&self) -> StoreResult<Vec<CategoryStat>> {
        let cursor = self
            .collection::<Document>(PAYMENTS)
            .aggregate(analytics_service::order_stats_pipeline(MENU))
            .await?;
        let rows: Vec<Document> = cursor.try_collect().await?;

        rows.into_iter()
            .map(|row| {
                mongodb::bson::from_document::<CategoryStat>(row)
                    .map_err(|e| StoreError::Decode(e.to_string()))
            })
            .collect()
    }
}
