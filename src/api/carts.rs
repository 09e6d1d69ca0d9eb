use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::Store;
use crate::models::{CartItem, CartItemResponse, DeleteResponse, InsertResponse, NewCartItemRequest};
use crate::services::user_service::parse_object_id;
use crate::utils::error::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CartQuery {
    pub email: String,
}

#[utoipa::path(
    get,
    path = "/carts",
    tag = "Carts",
    params(CartQuery),
    responses((status = 200, description = "The user's cart entries", body = [CartItemResponse]))
)]
pub async fn list_cart(
    store: web::Data<dyn Store>,
    query: web::Query<CartQuery>,
) -> Result<HttpResponse, AppError> {
    let items: Vec<CartItemResponse> = store
        .list_cart(&query.email)
        .await?
        .into_iter()
        .map(CartItemResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    post,
    path = "/carts",
    tag = "Carts",
    request_body = NewCartItemRequest,
    responses((status = 200, description = "Entry added", body = InsertResponse))
)]
pub async fn add_to_cart(
    store: web::Data<dyn Store>,
    request: web::Json<NewCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    if !request.price.is_finite() || request.price < 0.0 {
        return Err(AppError::InvalidRequest("price must be non-negative".to_string()));
    }

    let item = CartItem::from(request.into_inner());
    let id = store.insert_cart_item(&item).await?;

    log::info!("🛒 POST /carts - {} added {}", item.email, item.menu_id);
    Ok(HttpResponse::Ok().json(InsertResponse {
        inserted_id: id.to_hex(),
    }))
}

#[utoipa::path(
    delete,
    path = "/carts/{id}",
    tag = "Carts",
    params(("id" = String, Path, description = "Cart entry ObjectId")),
    responses((status = 200, description = "Number of entries removed", body = DeleteResponse))
)]
pub async fn remove_from_cart(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let deleted_count = store.delete_cart_item(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { deleted_count }))
}
