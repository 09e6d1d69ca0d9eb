use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::database::Store;
use crate::models::{AdminStats, CategoryStat};
use crate::services::analytics_service;
use crate::utils::error::AppError;

#[utoipa::path(
    get,
    path = "/order-stats",
    tag = "Analytics",
    responses(
        (status = 200, description = "Quantity and revenue per category, unordered", body = [CategoryStat]),
        (status = 403, description = "Caller is not an admin"),
        (status = 504, description = "Aggregation exceeded its time budget")
    ),
    security(("bearer_auth" = []))
)]
pub async fn order_stats(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let rows = analytics_service::order_stats(store.get_ref(), config.aggregation_timeout).await?;

    log::info!("📊 GET /order-stats - {} categories", rows.len());
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/admin-stats",
    tag = "Analytics",
    responses(
        (status = 200, description = "Approximate counts and total revenue", body = AdminStats),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_stats(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let stats = analytics_service::admin_summary(store.get_ref(), config.aggregation_timeout).await?;
    Ok(HttpResponse::Ok().json(stats))
}
