use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::utils::error::AppError;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
const CURRENCY: &str = "usd";

/// Creates card payment intents. The service only ever sees the client secret,
/// never card data.
#[async_trait]
pub trait PaymentIntentProvider: Send + Sync {
    /// `amount_cents` is in minor units.
    async fn create_intent(&self, amount_cents: i64) -> Result<String, AppError>;
}

/// Converts a major-unit price (e.g. `19.99`) to cents, rounding to the nearest cent.
pub fn to_minor_units(price: f64) -> Result<i64, AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::InvalidRequest(format!(
            "price must be a positive number, got {}",
            price
        )));
    }
    let cents = (price * 100.0).round();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return Err(AppError::InvalidRequest(format!("price out of range: {}", price)));
    }
    Ok(cents as i64)
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

pub struct StripeClient {
    secret_key: String,
    client: Client,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { secret_key, client })
    }
}

#[async_trait]
impl PaymentIntentProvider for StripeClient {
    async fn create_intent(&self, amount_cents: i64) -> Result<String, AppError> {
        let amount = amount_cents.to_string();
        let params = [
            ("amount", amount.as_str()),
            ("currency", CURRENCY),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(format!("{}/payment_intents", STRIPE_API_BASE))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Stripe request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| format!("Stripe API error: {}", status));
            return Err(AppError::PaymentProvider(message));
        }

        let intent: StripePaymentIntent = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("Failed to parse Stripe response: {}", e)))?;

        log::info!("💳 Payment intent {} created ({} cents)", intent.id, amount_cents);

        intent
            .client_secret
            .ok_or_else(|| AppError::PaymentProvider("Stripe returned no client secret".to_string()))
    }
}

/// Stand-in used when no Stripe key is configured.
pub struct UnconfiguredProvider;

#[async_trait]
impl PaymentIntentProvider for UnconfiguredProvider {
    async fn create_intent(&self, _amount_cents: i64) -> Result<String, AppError> {
        Err(AppError::Unavailable(
            "payment provider is not configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(to_minor_units(0.29).unwrap(), 29);
        assert_eq!(to_minor_units(10.0).unwrap(), 1000);
    }

    #[test]
    fn test_non_positive_prices_rejected() {
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(-3.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(0.001).is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_unavailable() {
        let err = UnconfiguredProvider.create_intent(1000).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }
}
