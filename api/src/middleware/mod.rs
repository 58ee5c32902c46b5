//! Request middleware: bearer authentication, admin gating, CORS

pub mod admin;
pub mod auth;
pub mod cors;

pub use admin::RequireAdmin;
pub use auth::{AuthContext, JwtAuth};
pub use cors::create_cors;
