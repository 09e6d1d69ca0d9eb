use crate::database::Store;
use crate::services::Claims;
use crate::utils::error::{AppError, AuthzError};

/// One store read: the caller must exist and hold the `admin` role.
pub async fn require_admin(store: &dyn Store, email: &str) -> Result<(), AppError> {
    match store.find_user_by_email(email).await? {
        Some(user) if user.is_admin() => Ok(()),
        _ => Err(AuthzError::Forbidden.into()),
    }
}

/// The route's `:email` must be the caller's own. Role does not matter here.
pub fn require_same_identity(claims: &Claims, email: &str) -> Result<(), AuthzError> {
    if claims.email() == email {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}
