use actix_web::{web, HttpResponse};

use crate::services::token_service::TokenResponse;
use crate::services::{IdentityClaims, TokenService};
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body(content = serde_json::Value, description = "Identity payload; must contain `email`"),
    responses(
        (status = 200, description = "Signed token, valid for the configured TTL", body = TokenResponse),
        (status = 400, description = "Missing or malformed email")
    )
)]
pub async fn issue_token(
    tokens: web::Data<TokenService>,
    identity: web::Json<IdentityClaims>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /jwt - email: {}", identity.email);

    let token = tokens.issue(&identity)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
