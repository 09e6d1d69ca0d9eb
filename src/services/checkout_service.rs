use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::database::{Store, StoreError};
use crate::models::{CheckoutRequest, PaymentRecord};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("invalid cart entry id: {0}")]
    InvalidCartEntryId(String),
    #[error("invalid payment amount: {0}")]
    InvalidAmount(f64),
    #[error("failed to record payment: {0}")]
    PaymentWriteFailed(StoreError),
}

#[derive(Debug)]
pub struct CheckoutOutcome {
    pub payment: PaymentRecord,
    /// Entries actually deleted. Can be lower than requested when another
    /// request already removed some of them.
    pub removed_count: u64,
    /// The payment stands even when cart cleanup fails; the failure is reported here.
    pub cleanup_error: Option<StoreError>,
}

/// Records the payment, then deletes the cart entries it paid for.
///
/// The cart ids come from the caller and are not re-derived from the cart's
/// current contents. Nothing is touched when the payment write fails, and a
/// cleanup failure after the write is never rolled back.
pub async fn checkout(
    store: &dyn Store,
    request: CheckoutRequest,
) -> Result<CheckoutOutcome, CheckoutError> {
    if !request.price.is_finite() || request.price < 0.0 {
        return Err(CheckoutError::InvalidAmount(request.price));
    }

    let cart_ids = request
        .cart_entry_ids
        .iter()
        .map(|raw| {
            ObjectId::parse_str(raw).map_err(|_| CheckoutError::InvalidCartEntryId(raw.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut payment = PaymentRecord {
        id: None,
        email: request.email,
        amount: request.price,
        transaction_id: request.transaction_id,
        ordered_at: request.date.unwrap_or_else(Utc::now),
        menu_item_ids: request.menu_item_ids,
        cart_entry_ids: request.cart_entry_ids,
        status: request.status,
    };

    let payment_id = store
        .insert_payment(&payment)
        .await
        .map_err(CheckoutError::PaymentWriteFailed)?;
    payment.id = Some(payment_id);

    log::info!(
        "💳 Payment {} recorded for {} ({:.2})",
        payment_id.to_hex(),
        payment.email,
        payment.amount
    );

    let (removed_count, cleanup_error) = match store.delete_cart_items(&cart_ids).await {
        Ok(removed) => {
            if removed < cart_ids.len() as u64 {
                log::info!(
                    "🛒 Cleared {} of {} cart entries for payment {}",
                    removed,
                    cart_ids.len(),
                    payment_id.to_hex()
                );
            }
            (removed, None)
        }
        Err(e) => {
            log::error!(
                "❌ Payment {} recorded but cart cleanup failed: {}",
                payment_id.to_hex(),
                e
            );
            (0, Some(e))
        }
    };

    Ok(CheckoutOutcome {
        payment,
        removed_count,
        cleanup_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;

    fn request(email: &str, cart_ids: Vec<String>) -> CheckoutRequest {
        CheckoutRequest {
            email: email.to_string(),
            price: 12.0,
            transaction_id: Some("pi_test".into()),
            date: None,
            menu_item_ids: vec![],
            cart_entry_ids: cart_ids,
            status: Some("pending".into()),
        }
    }

    #[tokio::test]
    async fn test_partial_cart_removal_still_records_payment() {
        let store = InMemoryStore::new();
        let menu = store.seed_menu_item("Cake", "Dessert", 5.0);
        let a = store.seed_cart_item("ana@bistro.test", &menu, 5.0);
        let b = ObjectId::new(); // never existed

        let outcome = checkout(&store, request("ana@bistro.test", vec![a.to_hex(), b.to_hex()]))
            .await
            .unwrap();

        assert_eq!(outcome.removed_count, 1);
        assert!(outcome.cleanup_error.is_none());
        assert!(outcome.payment.id.is_some());
        assert_eq!(store.payments().len(), 1);
        assert_eq!(store.cart_len(), 0);
    }

    #[tokio::test]
    async fn test_failed_payment_write_leaves_cart_untouched() {
        let store = InMemoryStore::new();
        let menu = store.seed_menu_item("Cake", "Dessert", 5.0);
        let a = store.seed_cart_item("ana@bistro.test", &menu, 5.0);
        store.fail_payment_inserts(true);

        let err = checkout(&store, request("ana@bistro.test", vec![a.to_hex()]))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentWriteFailed(_)));
        assert_eq!(store.cart_len(), 1);
        assert!(store.payments().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_failure_is_reported_not_rolled_back() {
        let store = InMemoryStore::new();
        let menu = store.seed_menu_item("Soup", "Soup", 4.0);
        let a = store.seed_cart_item("ana@bistro.test", &menu, 4.0);
        store.fail_cart_deletes(true);

        let outcome = checkout(&store, request("ana@bistro.test", vec![a.to_hex()]))
            .await
            .unwrap();

        assert!(outcome.cleanup_error.is_some());
        assert_eq!(outcome.removed_count, 0);
        assert_eq!(store.payments().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_writes_nothing() {
        let store = InMemoryStore::new();

        let err = checkout(&store, request("ana@bistro.test", vec!["not-an-id".into()]))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidCartEntryId(_)));

        let mut negative = request("ana@bistro.test", vec![]);
        negative.price = -1.0;
        let err = checkout(&store, negative).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidAmount(_)));

        assert!(store.payments().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_checkouts_share_removals() {
        let store = InMemoryStore::new();
        let menu = store.seed_menu_item("Pizza", "Pizza", 10.0);
        let a = store.seed_cart_item("ana@bistro.test", &menu, 10.0);

        let first = checkout(&store, request("ana@bistro.test", vec![a.to_hex()]))
            .await
            .unwrap();
        let second = checkout(&store, request("ana@bistro.test", vec![a.to_hex()]))
            .await
            .unwrap();

        assert_eq!(first.removed_count + second.removed_count, 1);
        assert_eq!(store.payments().len(), 2);
    }
}
