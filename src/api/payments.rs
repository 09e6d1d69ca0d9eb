use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::middleware::access;
use crate::models::{
    CheckoutRequest, CheckoutResponse, PaymentIntentRequest, PaymentIntentResponse,
    PaymentResponse,
};
use crate::services::checkout_service;
use crate::services::payment_intent_service::{self, PaymentIntentProvider};
use crate::services::Claims;
use crate::utils::error::AppError;

#[utoipa::path(
    get,
    path = "/payments/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "Must be the caller's own email")),
    responses(
        (status = 200, description = "Payment history", body = [PaymentResponse]),
        (status = 403, description = "Email differs from the token's identity")
    ),
    security(("bearer_auth" = []))
)]
pub async fn payment_history(
    store: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    access::require_same_identity(&claims, &email)?;

    let payments: Vec<PaymentResponse> = store
        .list_payments(&email)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(payments))
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Payment recorded; `cleanupError` set if the cart could not be cleared", body = CheckoutResponse),
        (status = 400, description = "Invalid amount or cart entry id"),
        (status = 500, description = "Payment could not be recorded; cart untouched")
    )
)]
pub async fn create_payment(
    store: web::Data<dyn Store>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("💳 POST /payments - email: {}", request.email);

    let outcome = checkout_service::checkout(store.get_ref(), request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        payment_record: PaymentResponse::from(outcome.payment),
        removed_count: outcome.removed_count,
        cleanup_error: outcome.cleanup_error.map(|_| "failed to clear cart entries".to_string()),
    }))
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret for the front end", body = PaymentIntentResponse),
        (status = 400, description = "Price is not a positive amount"),
        (status = 502, description = "Payment provider error"),
        (status = 503, description = "Payment provider not configured")
    )
)]
pub async fn create_payment_intent(
    provider: web::Data<dyn PaymentIntentProvider>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    let amount_cents = payment_intent_service::to_minor_units(request.price)?;
    log::info!("💰 POST /create-payment-intent - {} cents", amount_cents);

    let client_secret = provider.create_intent(amount_cents).await?;
    Ok(HttpResponse::Ok().json(PaymentIntentResponse { client_secret }))
}
