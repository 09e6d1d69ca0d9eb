pub mod access;
pub mod admin;
pub mod auth;

pub use admin::RequireAdmin;
pub use auth::RequireAuth;
