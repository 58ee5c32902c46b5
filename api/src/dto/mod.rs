//! Request and response data transfer objects

pub mod auth;

pub use auth::{
    ChangePasswordRequest, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest,
    UpdateStatusRequest,
};
