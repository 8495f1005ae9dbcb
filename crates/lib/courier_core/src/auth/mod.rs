//! Token authority: credential validation, signed access tokens, and
//! rotating refresh tokens.

pub mod jwt;
pub mod password;

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use rand::RngCore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::auth::{
    NewUser, RefreshToken, Role, TokenClaims, TokenPair, User, UserUpdate,
};
use crate::store::{RefreshTokenStore, UserStore, ensure_present};

/// Refresh-token material: 32 CSPRNG bytes, base64-encoded.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Minimum accepted password length at registration.
const MIN_PASSWORD_LEN: usize = 8;

/// Signing and lifetime configuration for the token authority, read
/// from the environment at startup.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Symmetric HS256 signing key.
    pub signing_key: String,
    pub issuer: String,
    pub audience: String,
    pub access_lifetime_minutes: i64,
    pub refresh_lifetime_minutes: i64,
}

/// Generate a fresh refresh-token value. Drawn from the thread-local
/// CSPRNG; tracking numbers elsewhere deliberately use a weaker source.
fn generate_refresh_value() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// The identity service's domain core.
pub struct TokenAuthority {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    config: TokenConfig,
}

impl TokenAuthority {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        config: TokenConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            config,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Register a new user with the default role and a hashed password.
    pub async fn register(&self, new: NewUser) -> DomainResult<User> {
        if new.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.users.find_by_email(&new.email).await?.is_some() {
            warn!(email = %new.email, "registration rejected: email taken");
            return Err(DomainError::AlreadyExists("user"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: password::hash_password(&new.password)?,
            role: Role::default(),
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
        };
        self.users.add(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// The shared credential-check primitive. Fails `NotFound` for an
    /// unknown email and for a wrong password alike, so a caller cannot
    /// tell which one failed.
    pub async fn validate_user(&self, email: &str, password: &str) -> DomainResult<User> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!(email, "credential check failed: unknown email");
                return Err(DomainError::NotFound("user"));
            }
        };
        if !password::verify_password(password, &user.password_hash)? {
            warn!(email, "credential check failed: wrong password");
            return Err(DomainError::NotFound("user"));
        }
        Ok(user)
    }

    /// Validate credentials and issue an access/refresh token pair.
    ///
    /// Persists one new refresh row per call; older unexpired tokens are
    /// only retired through rotation.
    pub async fn authorize(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let user = self.validate_user(email, password).await?;

        let refresh = RefreshToken {
            id: Uuid::now_v7(),
            token: generate_refresh_value(),
            created_at: Utc::now(),
            lifetime_minutes: self.config.refresh_lifetime_minutes,
            user_id: user.id,
        };
        self.refresh_tokens.add(&refresh).await?;

        let access_token = jwt::generate_access_token(&user, &self.config)?;
        info!(user_id = %user.id, "authorized, refresh token issued");

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
            refresh_expires_in_minutes: refresh.lifetime_minutes,
        })
    }

    /// Exchange a refresh token for a fresh pair, rotating the stored
    /// value in place. The old string is permanently invalid afterwards;
    /// the row identity is preserved.
    pub async fn refresh(&self, token: &str) -> DomainResult<TokenPair> {
        let stored = match self.refresh_tokens.find_by_token(token).await? {
            Some(stored) => stored,
            None => {
                warn!("refresh rejected: unknown token");
                return Err(DomainError::NotFound("refresh token"));
            }
        };
        if !stored.is_active(Utc::now()) {
            warn!(token_id = %stored.id, "refresh rejected: token expired");
            return Err(DomainError::NotFound("refresh token"));
        }

        // Dangling rows (user deleted underneath) are treated as absent.
        let user = match self.users.get(stored.user_id).await? {
            Some(user) => user,
            None => {
                warn!(token_id = %stored.id, "refresh rejected: dangling user link");
                return Err(DomainError::NotFound("user"));
            }
        };

        let new_value = generate_refresh_value();
        self.refresh_tokens
            .rotate(stored.id, &new_value, Utc::now())
            .await?;

        let access_token = jwt::generate_access_token(&user, &self.config)?;
        info!(user_id = %user.id, token_id = %stored.id, "refresh token rotated");

        Ok(TokenPair {
            access_token,
            refresh_token: new_value,
            refresh_expires_in_minutes: stored.lifetime_minutes,
        })
    }

    /// Claim set for a user id; `NotFound` when absent.
    pub async fn user_claims(&self, id: Uuid) -> DomainResult<TokenClaims> {
        let user = ensure_present(self.users.as_ref(), id).await?;
        Ok(jwt::claims_for(&user, &self.config))
    }

    /// Verify an access token against this authority's configuration.
    pub fn verify_access_token(&self, token: &str) -> Option<TokenClaims> {
        jwt::verify_access_token(token, &self.config)
    }

    // -- user profile CRUD ------------------------------------------------

    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        ensure_present(self.users.as_ref(), id).await
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.users.get_all().await
    }

    /// Overwrite profile fields; re-hash the password when one is given.
    pub async fn update_user(&self, update: UserUpdate) -> DomainResult<User> {
        let mut user = ensure_present(self.users.as_ref(), update.id).await?;
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.phone = update.phone;
        if let Some(password) = update.password {
            user.password_hash = password::hash_password(&password)?;
        }
        self.users.update(&user).await?;
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> DomainResult<User> {
        let user = ensure_present(self.users.as_ref(), id).await?;
        self.users.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(user)
    }
}
