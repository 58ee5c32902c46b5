//! HTTP route handlers

pub mod admin;
pub mod auth;
