//! Token authority configuration, read from the environment.

use courier_core::auth::TokenConfig;

/// Default HS256 key for local development only.
const DEV_SIGNING_KEY: &str = "courier-dev-signing-key-change-in-production";

/// Read the token authority configuration from the environment.
///
/// | Variable                         | Default                      |
/// |----------------------------------|------------------------------|
/// | `JWT_SIGNING_KEY`                | dev key (not for production) |
/// | `JWT_ISSUER`                     | `courier-identity`           |
/// | `JWT_AUDIENCE`                   | `courier-clients`            |
/// | `ACCESS_TOKEN_LIFETIME_MINUTES`  | `15`                         |
/// | `REFRESH_TOKEN_LIFETIME_MINUTES` | `10080` (7 days)             |
pub fn token_config_from_env() -> TokenConfig {
    TokenConfig {
        signing_key: std::env::var("JWT_SIGNING_KEY").unwrap_or_else(|_| DEV_SIGNING_KEY.into()),
        issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "courier-identity".into()),
        audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "courier-clients".into()),
        access_lifetime_minutes: env_minutes("ACCESS_TOKEN_LIFETIME_MINUTES", 15),
        refresh_lifetime_minutes: env_minutes("REFRESH_TOKEN_LIFETIME_MINUTES", 7 * 24 * 60),
    }
}

fn env_minutes(var: &str, default: i64) -> i64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
