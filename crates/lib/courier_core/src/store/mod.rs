//! Persistence gateway.
//!
//! The domain services never issue raw queries; everything goes through
//! the per-entity store traits defined here. Each mutating call is one
//! logical unit of work (a single statement against the backend).
//!
//! Two implementations ship with the crate: [`postgres`] (sqlx) and
//! [`memory`] (a `RwLock<HashMap>` table used by the test suites).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::auth::{RefreshToken, User};
use crate::models::expedition::{Location, Package, Person};
use crate::models::shipment::{Shipment, ShipmentFilter};

/// Anything with a uuid identity that a store can hold.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    /// Noun used in error messages ("user", "shipment", ...).
    fn kind() -> &'static str;
}

macro_rules! impl_entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
            fn kind() -> &'static str {
                $kind
            }
        }
    };
}

impl_entity!(User, "user");
impl_entity!(RefreshToken, "refresh token");
impl_entity!(Person, "person");
impl_entity!(Location, "location");
impl_entity!(Package, "package");
impl_entity!(Shipment, "shipment");

/// Per-entity repository: add, update, delete, get, get-all.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Insert a new row. Fails `AlreadyExists` when the identity is taken.
    async fn add(&self, item: &T) -> DomainResult<()>;

    /// Overwrite an existing row. Fails `NotFound` when absent.
    async fn update(&self, item: &T) -> DomainResult<()>;

    /// Remove a row. Fails `NotFound` when absent.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Fetch by identity.
    async fn get(&self, id: Uuid) -> DomainResult<Option<T>>;

    /// Fetch every row.
    async fn get_all(&self) -> DomainResult<Vec<T>>;
}

/// Fetch an entity that must exist, or report `NotFound`.
pub async fn ensure_present<T: Entity>(store: &dyn EntityStore<T>, id: Uuid) -> DomainResult<T> {
    store
        .get(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(T::kind()))
}

/// Verify an identity is free, or report `AlreadyExists`.
pub async fn ensure_absent<T: Entity>(store: &dyn EntityStore<T>, id: Uuid) -> DomainResult<()> {
    if store.get(id).await?.is_some() {
        return Err(DomainError::AlreadyExists(T::kind()));
    }
    Ok(())
}

/// User repository with the credential lookup the token authority needs.
#[async_trait]
pub trait UserStore: EntityStore<User> {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}

/// Refresh-token repository. Rotation replaces the opaque value and the
/// creation timestamp in place, preserving the row identity.
#[async_trait]
pub trait RefreshTokenStore: EntityStore<RefreshToken> {
    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>>;

    async fn rotate(
        &self,
        id: Uuid,
        new_token: &str,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> DomainResult<()>;
}

/// Person repository with contact lookups.
#[async_trait]
pub trait PersonStore: EntityStore<Person> {
    async fn find_by_phone(&self, phone: &str) -> DomainResult<Option<Person>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Person>>;
}

/// Location repository with a city lookup.
#[async_trait]
pub trait LocationStore: EntityStore<Location> {
    async fn find_by_city(&self, city: &str) -> DomainResult<Vec<Location>>;
}

/// Package repository with an owner lookup.
#[async_trait]
pub trait PackageStore: EntityStore<Package> {
    async fn find_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Package>>;
}

/// Shipment repository with the single-field predicate lookup.
#[async_trait]
pub trait ShipmentStore: EntityStore<Shipment> {
    async fn find_one(&self, filter: &ShipmentFilter) -> DomainResult<Option<Shipment>>;
}
