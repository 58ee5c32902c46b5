//! # TaskBoard API
//!
//! HTTP surface for the TaskBoard backend: route handlers, request DTOs,
//! authentication middleware, and the application factory. All business
//! rules live in `tb_core`; this crate translates between HTTP and the
//! session service.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::AppState;
