use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};

/// Stored role. Anything other than `admin` (including a missing field) reads as regular.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Regular,
}

/// User document (collection `user`), keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Any other profile fields the client sent on sign-in.
    #[serde(flatten)]
    pub profile: Document,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    pub email: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl NewUserRequest {
    /// Builds the document to insert. Identity and role keys in the free-form
    /// profile are dropped, so a sign-in can never grant itself admin.
    pub fn into_user(self) -> Result<User, String> {
        let mut profile = self.profile;
        for reserved in ["_id", "email", "name", "role"] {
            profile.remove(reserved);
        }
        let profile = mongodb::bson::to_document(&profile)
            .map_err(|e| format!("invalid profile fields: {}", e))?;

        Ok(User {
            id: None,
            email: self.email,
            name: self.name,
            role: Role::Regular,
            profile,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let profile = match Bson::Document(user.profile).into_relaxed_extjson() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            name: user.name,
            role: user.role,
            profile,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `null` when the email was already registered.
    pub inserted_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminFlagResponse {
    pub admin: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
}
