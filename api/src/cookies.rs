//! Refresh token cookie construction.
//!
//! The refresh token travels to browsers in an `HttpOnly` cookie scoped to
//! the whole API: `SameSite=Strict`, `Secure` outside development, max age
//! matching the refresh token expiry. Logout variants clear it by setting
//! an empty value with max age zero.

use actix_web::cookie::{time::Duration, Cookie, SameSite};

use tb_shared::{AuthConfig, Environment};

/// Build the refresh token cookie for a successful register/login
pub fn refresh_cookie(auth: &AuthConfig, environment: Environment, token: &str) -> Cookie<'static> {
    Cookie::build(auth.refresh_cookie_name.clone(), token.to_string())
        .path("/")
        .http_only(true)
        .secure(environment.is_production())
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(auth.refresh_cookie_max_age_seconds()))
        .finish()
}

/// Build an expired cookie that removes the stored refresh token
pub fn clear_refresh_cookie(auth: &AuthConfig, environment: Environment) -> Cookie<'static> {
    Cookie::build(auth.refresh_cookie_name.clone(), String::new())
        .path("/")
        .http_only(true)
        .secure(environment.is_production())
        .same_site(SameSite::Strict)
        .max_age(Duration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_cookie_attributes() {
        let auth = AuthConfig::default();
        let cookie = refresh_cookie(&auth, Environment::Development, "token-value");

        assert_eq!(cookie.name(), "refresh_token");
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
        // Local development runs over plain HTTP.
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_production_cookie_is_secure() {
        let auth = AuthConfig::default();
        let cookie = refresh_cookie(&auth, Environment::Production, "token-value");
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let auth = AuthConfig::default();
        let cookie = clear_refresh_cookie(&auth, Environment::Development);

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
