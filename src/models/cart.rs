use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One line in a user's cart (collection `Cart`). `price` is a snapshot taken when added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub menu_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
}

/// Body of `POST /carts`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItemRequest {
    pub email: String,
    pub menu_id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: f64,
}

impl From<NewCartItemRequest> for CartItem {
    fn from(request: NewCartItemRequest) -> Self {
        CartItem {
            id: None,
            email: request.email,
            menu_id: request.menu_id,
            name: request.name,
            image: request.image,
            price: request.price,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub menu_id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: f64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            id: item.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: item.email,
            menu_id: item.menu_id,
            name: item.name,
            image: item.image,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub inserted_id: String,
}
