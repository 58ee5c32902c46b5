//! Authentication route handlers:
//! - Registration and login, which open a session and set the refresh cookie
//! - Token refresh from cookie or body
//! - Logout for one device or all devices
//! - Profile lookup and password change for the authenticated user

pub mod login;
pub mod logout;
pub mod me;
pub mod password;
pub mod refresh;
pub mod register;

pub use login::login;
pub use logout::{logout, logout_all};
pub use me::me;
pub use password::change_password;
pub use refresh::refresh;
pub use register::register;
