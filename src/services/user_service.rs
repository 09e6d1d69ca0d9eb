use mongodb::bson::oid::ObjectId;

use crate::database::{Store, StoreError, UpdateSummary};
use crate::models::{NewUserRequest, Role};
use crate::utils::error::AppError;

#[derive(Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(ObjectId),
    AlreadyExists,
}

/// First sign-in creates the user; later calls for the same email are no-ops.
pub async fn upsert_user(
    store: &dyn Store,
    request: NewUserRequest,
) -> Result<UpsertOutcome, AppError> {
    if store.find_user_by_email(&request.email).await?.is_some() {
        return Ok(UpsertOutcome::AlreadyExists);
    }

    let user = request.into_user().map_err(AppError::InvalidRequest)?;
    match store.insert_user(&user).await {
        Ok(id) => {
            log::info!("✅ User created: {}", user.email);
            Ok(UpsertOutcome::Inserted(id))
        }
        // Lost a race against a concurrent sign-in for the same email
        Err(StoreError::DuplicateKey) => Ok(UpsertOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

/// `false` when no user has this email.
pub async fn is_admin(store: &dyn Store, email: &str) -> Result<bool, StoreError> {
    Ok(store
        .find_user_by_email(email)
        .await?
        .is_some_and(|user| user.is_admin()))
}

pub async fn promote_to_admin(store: &dyn Store, id: &ObjectId) -> Result<UpdateSummary, StoreError> {
    let summary = store.set_user_role(id, Role::Admin).await?;
    if summary.matched == 0 {
        log::warn!("⚠️ Promotion requested for unknown user {}", id.to_hex());
    } else {
        log::info!("👑 User {} promoted to admin", id.to_hex());
    }
    Ok(summary)
}

pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidRequest(format!("invalid id: {}", raw)))
}
