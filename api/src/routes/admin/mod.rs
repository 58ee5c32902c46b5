//! Administrative route handlers, gated by the admin role middleware

pub mod cleanup;
pub mod users;

pub use cleanup::run_cleanup;
pub use users::update_user_status;
