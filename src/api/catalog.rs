use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{MenuItemResponse, ReviewResponse};
use crate::services::user_service::parse_object_id;
use crate::utils::error::AppError;

#[utoipa::path(
    get,
    path = "/menu",
    tag = "Catalog",
    responses((status = 200, description = "Every catalog item", body = [MenuItemResponse]))
)]
pub async fn list_menu(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let items: Vec<MenuItemResponse> = store
        .list_menu()
        .await?
        .into_iter()
        .map(MenuItemResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    get,
    path = "/menu/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Catalog item ObjectId")),
    responses(
        (status = 200, description = "Catalog item", body = MenuItemResponse),
        (status = 404, description = "No such item")
    )
)]
pub async fn get_menu_item(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let item = store
        .find_menu_item(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", id.to_hex())))?;

    Ok(HttpResponse::Ok().json(MenuItemResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/review",
    tag = "Catalog",
    responses((status = 200, description = "Every review", body = [ReviewResponse]))
)]
pub async fn list_reviews(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let reviews: Vec<ReviewResponse> = store
        .list_reviews()
        .await?
        .into_iter()
        .map(ReviewResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(reviews))
}
