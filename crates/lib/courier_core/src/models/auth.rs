//! Identity domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of authorization roles. A user holds exactly one role
/// for token purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    /// Default role assigned at registration.
    #[default]
    User,
    Admin,
    Worker,
}

impl Role {
    /// Role name as stored and embedded in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::Worker => "Worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            "Worker" => Ok(Role::Worker),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash, never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl User {
    /// Display name embedded as the token subject.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for user registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Input for a profile update. `password` is optional; when present the
/// stored hash is replaced.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: Option<String>,
}

/// Refresh token row, owned by exactly one user.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: Uuid,
    /// Opaque random value handed to the client. Rotation overwrites it
    /// in place; the row id is preserved.
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub lifetime_minutes: i64,
    pub user_id: Uuid,
}

impl RefreshToken {
    /// A token is active while `now` is inside its lifetime window.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.created_at + Duration::minutes(self.lifetime_minutes)
    }
}

/// Claim set embedded in a signed access token. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — the user's display name.
    pub sub: String,
    pub email: String,
    /// Role name (e.g. `"User"`).
    pub role: String,
    pub given_name: String,
    pub iss: String,
    pub aud: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Result of a successful authorization or refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_in_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_first_of_fixed_list() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::Admin, Role::Worker] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("Superuser".parse::<Role>().is_err());
    }

    #[test]
    fn refresh_token_active_within_lifetime() {
        let now = Utc::now();
        let token = RefreshToken {
            id: Uuid::now_v7(),
            token: "opaque".into(),
            created_at: now,
            lifetime_minutes: 60,
            user_id: Uuid::new_v4(),
        };
        assert!(token.is_active(now + Duration::minutes(59)));
        assert!(!token.is_active(now + Duration::minutes(60)));
        assert!(!token.is_active(now + Duration::minutes(61)));
    }
}
