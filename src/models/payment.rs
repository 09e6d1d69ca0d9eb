use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A recorded checkout (collection `payment`). Written once, never updated.
///
/// Field names follow the documents the web client has always produced:
/// `price` is the paid amount, `menuId` the purchased catalog references and
/// `cartId` the cart entries cleared by this payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(rename = "price")]
    pub amount: f64,
    #[serde(rename = "transactionId", default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(rename = "date")]
    pub ordered_at: DateTime<Utc>,
    #[serde(rename = "menuId", default)]
    pub menu_item_ids: Vec<String>,
    #[serde(rename = "cartId", default)]
    pub cart_entry_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CheckoutRequest {
    pub email: String,
    #[serde(alias = "amount")]
    pub price: f64,
    #[serde(rename = "transactionId", default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "menuId", default)]
    pub menu_item_ids: Vec<String>,
    #[serde(rename = "cartId", default)]
    pub cart_entry_ids: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaymentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub price: f64,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<Utc>,
    #[serde(rename = "menuId")]
    pub menu_item_ids: Vec<String>,
    #[serde(rename = "cartId")]
    pub cart_entry_ids: Vec<String>,
    pub status: Option<String>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        PaymentResponse {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: record.email,
            price: record.amount,
            transaction_id: record.transaction_id,
            date: record.ordered_at,
            menu_item_ids: record.menu_item_ids,
            cart_entry_ids: record.cart_entry_ids,
            status: record.status,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub payment_record: PaymentResponse,
    pub removed_count: u64,
    /// Set when the payment was recorded but clearing the cart failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentIntentRequest {
    /// Amount in major currency units (dollars).
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_request_accepts_client_payload() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "email": "ana@bistro.test",
            "price": 12.5,
            "transactionId": "pi_123",
            "date": "2024-03-01T12:00:00Z",
            "menuId": ["642c155b2c4774f05c36eeaa"],
            "cartId": ["65a0f0f0f0f0f0f0f0f0f0f0"],
            "status": "pending"
        }))
        .unwrap();

        assert_eq!(request.price, 12.5);
        assert_eq!(request.cart_entry_ids.len(), 1);
        assert!(request.date.is_some());
    }

    #[test]
    fn test_amount_alias() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "email": "ana@bistro.test",
            "amount": 7
        }))
        .unwrap();

        assert_eq!(request.price, 7.0);
        assert!(request.menu_item_ids.is_empty());
    }
}
