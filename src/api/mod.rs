pub mod auth;
pub mod carts;
pub mod catalog;
pub mod health;
pub mod payments;
pub mod stats;
pub mod swagger;
pub mod users;

use actix_web::{guard, web};

use crate::middleware::{RequireAdmin, RequireAuth};
use crate::utils::error::AppError;

/// Registers every route. Expects `web::Data` for `dyn Store`, `TokenService`,
/// `dyn PaymentIntentProvider` and `Config` on the app.
///
/// Gated resources wrap `RequireAdmin` before `RequireAuth`: the last wrap
/// runs first, so authentication always precedes the role check.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health_check))
    .route("/jwt", web::post().to(auth::issue_token))
    // Users
    .service(
        web::resource("/users")
            .guard(guard::Get())
            .wrap(RequireAdmin)
            .wrap(RequireAuth)
            .to(users::list_users),
    )
    .service(
        web::resource("/users")
            .guard(guard::Post())
            .to(users::upsert_user),
    )
    .service(
        web::resource("/users/admin/{email}")
            .guard(guard::Get())
            .wrap(RequireAuth)
            .to(users::check_admin),
    )
    .service(
        web::resource("/users/admin/{id}")
            .guard(guard::Patch())
            .wrap(RequireAdmin)
            .wrap(RequireAuth)
            .to(users::promote_user),
    )
    .service(
        web::resource("/users/{id}")
            .guard(guard::Delete())
            .wrap(RequireAdmin)
            .wrap(RequireAuth)
            .to(users::delete_user),
    )
    // Payments
    .service(
        web::resource("/payments/{email}")
            .guard(guard::Get())
            .wrap(RequireAuth)
            .to(payments::payment_history),
    )
    .route("/payments", web::post().to(payments::create_payment))
    .route(
        "/create-payment-intent",
        web::post().to(payments::create_payment_intent),
    )
    // Analytics
    .service(
        web::resource("/order-stats")
            .guard(guard::Get())
            .wrap(RequireAdmin)
            .wrap(RequireAuth)
            .to(stats::order_stats),
    )
    .service(
        web::resource("/admin-stats")
            .guard(guard::Get())
            .wrap(RequireAdmin)
            .wrap(RequireAuth)
            .to(stats::admin_stats),
    )
    // Catalog & carts
    .route("/menu", web::get().to(catalog::list_menu))
    .route("/menu/{id}", web::get().to(catalog::get_menu_item))
    .route("/review", web::get().to(catalog::list_reviews))
    .route("/carts", web::get().to(carts::list_cart))
    .route("/carts", web::post().to(carts::add_to_cart))
    .route("/carts/{id}", web::delete().to(carts::remove_from_cart));
}
