use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::middleware::access;
use crate::models::{
    AdminFlagResponse, DeleteResponse, NewUserRequest, UpdateResponse, UpsertUserResponse,
    UserResponse,
};
use crate::services::user_service::{self, UpsertOutcome};
use crate::services::Claims;
use crate::utils::error::AppError;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let users: Vec<UserResponse> = store
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    log::info!("👥 GET /users - {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body(content = serde_json::Value, description = "User profile; must contain `email`"),
    responses(
        (status = 200, description = "Created, or `insertedId: null` when the email already exists", body = UpsertUserResponse)
    )
)]
pub async fn upsert_user(
    store: web::Data<dyn Store>,
    request: web::Json<NewUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users - email: {}", request.email);

    let response = match user_service::upsert_user(store.get_ref(), request.into_inner()).await? {
        UpsertOutcome::Inserted(id) => UpsertUserResponse {
            message: None,
            inserted_id: Some(id.to_hex()),
        },
        UpsertOutcome::AlreadyExists => UpsertUserResponse {
            message: Some("user already exists".to_string()),
            inserted_id: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "Number of users removed", body = DeleteResponse),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = user_service::parse_object_id(&path)?;
    let deleted_count = store.delete_user(&id).await?;

    log::info!("🗑️ DELETE /users/{} - removed {}", id.to_hex(), deleted_count);
    Ok(HttpResponse::Ok().json(DeleteResponse { deleted_count }))
}

#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Must be the caller's own email")),
    responses(
        (status = 200, description = "Whether the caller is an admin", body = AdminFlagResponse),
        (status = 403, description = "Email differs from the token's identity")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_admin(
    store: web::Data<dyn Store>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    access::require_same_identity(&claims, &email)?;

    let admin = user_service::is_admin(store.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(AdminFlagResponse { admin }))
}

#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "Update counts", body = UpdateResponse),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn promote_user(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = user_service::parse_object_id(&path)?;
    let summary = user_service::promote_to_admin(store.get_ref(), &id).await?;

    Ok(HttpResponse::Ok().json(UpdateResponse {
        matched_count: summary.matched,
        modified_count: summary.modified,
    }))
}
