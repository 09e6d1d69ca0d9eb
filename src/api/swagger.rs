use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bistro Service API",
        version = "1.0.0",
        description = "Backend for the restaurant ordering app.\n\n**Authentication:** obtain a token from `POST /jwt` and send it as `Authorization: Bearer <token>`. Admin routes additionally require the caller's stored role to be `admin`."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::auth::issue_token,

        crate::api::users::list_users,
        crate::api::users::upsert_user,
        crate::api::users::delete_user,
        crate::api::users::check_admin,
        crate::api::users::promote_user,

        crate::api::payments::payment_history,
        crate::api::payments::create_payment,
        crate::api::payments::create_payment_intent,

        crate::api::stats::order_stats,
        crate::api::stats::admin_stats,

        crate::api::catalog::list_menu,
        crate::api::catalog::get_menu_item,
        crate::api::catalog::list_reviews,

        crate::api::carts::list_cart,
        crate::api::carts::add_to_cart,
        crate::api::carts::remove_from_cart,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::services::token_service::TokenResponse,
            crate::utils::error::ErrorBody,
            crate::models::Role,
            crate::models::UpsertUserResponse,
            crate::models::AdminFlagResponse,
            crate::models::DeleteResponse,
            crate::models::UpdateResponse,
            crate::models::CheckoutRequest,
            crate::models::CheckoutResponse,
            crate::models::PaymentResponse,
            crate::models::PaymentIntentRequest,
            crate::models::PaymentIntentResponse,
            crate::models::AdminStats,
            crate::models::CategoryStat,
            crate::models::MenuItemResponse,
            crate::models::ReviewResponse,
            crate::models::CartItemResponse,
            crate::models::NewCartItemRequest,
            crate::models::InsertResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoint."),
        (name = "Auth", description = "Token issuance."),
        (name = "Users", description = "User sign-in, listing and role management."),
        (name = "Payments", description = "Checkout, payment history and payment intents."),
        (name = "Analytics", description = "Admin reports aggregated from payments and the catalog."),
        (name = "Catalog", description = "Read-only menu and reviews."),
        (name = "Carts", description = "Per-user cart entries."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build()
                ),
            );
        }
    }
}
