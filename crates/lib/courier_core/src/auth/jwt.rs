//! Signed access-token encoding and verification (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::TokenConfig;
use crate::error::{DomainError, DomainResult};
use crate::models::auth::{TokenClaims, User};

/// Build the claim set for a user: subject = display name, plus email,
/// role and given name. Expiry comes from the configured lifetime.
pub fn claims_for(user: &User, config: &TokenConfig) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user.display_name(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        given_name: user.first_name.clone(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        exp: (now + Duration::minutes(config.access_lifetime_minutes)).timestamp(),
        iat: now.timestamp(),
    }
}

/// Sign an access token for the user.
pub fn generate_access_token(user: &User, config: &TokenConfig) -> DomainResult<String> {
    let claims = claims_for(user, config);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.signing_key.as_bytes()),
    )
    .map_err(|e| DomainError::Token(format!("jwt encode: {e}")))
}

/// Verify an access token, returning the claims on success. Checks
/// signature, expiry, issuer and audience.
pub fn verify_access_token(token: &str, config: &TokenConfig) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(config.signing_key.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}
