//! In-memory persistence gateway.
//!
//! Backs the unit and integration test suites; no external database
//! required. Semantics mirror the Postgres stores: duplicate inserts
//! fail `AlreadyExists`, updates and deletes of absent rows fail
//! `NotFound`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::auth::{RefreshToken, User};
use crate::models::expedition::{Location, Package, Person};
use crate::models::shipment::{Shipment, ShipmentFilter};
use crate::store::{
    Entity, EntityStore, LocationStore, PackageStore, PersonStore, RefreshTokenStore,
    ShipmentStore, UserStore,
};

/// One in-memory table, keyed by entity id.
#[derive(Debug, Default)]
pub struct MemTable<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Entity> MemTable<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Number of rows held. Used by tests to assert no-write guarantees.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// All rows matching a predicate.
    async fn scan<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.read().await.values().filter(|t| pred(t)).cloned().collect()
    }

    /// First row matching a predicate.
    async fn scan_one<F>(&self, pred: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.read().await.values().find(|t| pred(t)).cloned()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemTable<T> {
    async fn add(&self, item: &T) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&item.id()) {
            return Err(DomainError::AlreadyExists(T::kind()));
        }
        rows.insert(item.id(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &T) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&item.id()) {
            return Err(DomainError::NotFound(T::kind()));
        }
        rows.insert(item.id(), item.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        rows.remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound(T::kind()))
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<T>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> DomainResult<Vec<T>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl UserStore for MemTable<User> {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self.scan_one(|u| u.email == email).await)
    }
}

#[async_trait]
impl RefreshTokenStore for MemTable<RefreshToken> {
    async fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        Ok(self.scan_one(|t| t.token == token).await)
    }

    async fn rotate(
        &self,
        id: Uuid,
        new_token: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&id)
            .ok_or(DomainError::NotFound(RefreshToken::kind()))?;
        row.token = new_token.to_string();
        row.created_at = created_at;
        Ok(())
    }
}

#[async_trait]
impl PersonStore for MemTable<Person> {
    async fn find_by_phone(&self, phone: &str) -> DomainResult<Option<Person>> {
        Ok(self.scan_one(|p| p.phone == phone).await)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Person>> {
        Ok(self.scan_one(|p| p.email == email).await)
    }
}

#[async_trait]
impl LocationStore for MemTable<Location> {
    async fn find_by_city(&self, city: &str) -> DomainResult<Vec<Location>> {
        Ok(self.scan(|l| l.city == city).await)
    }
}

#[async_trait]
impl PackageStore for MemTable<Package> {
    async fn find_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Package>> {
        Ok(self.scan(|p| p.owner_id == owner_id).await)
    }
}

#[async_trait]
impl ShipmentStore for MemTable<Shipment> {
    async fn find_one(&self, filter: &ShipmentFilter) -> DomainResult<Option<Shipment>> {
        let found = match filter {
            ShipmentFilter::TrackingNumber(n) => {
                self.scan_one(|s| s.tracking_number == *n).await
            }
            ShipmentFilter::PickupAt(at) => self.scan_one(|s| s.pickup_at == *at).await,
            ShipmentFilter::DeliveredAt(at) => {
                self.scan_one(|s| s.delivered_at == Some(*at)).await
            }
            ShipmentFilter::Cost(cost) => self.scan_one(|s| s.cost == *cost).await,
            ShipmentFilter::Status(status) => self.scan_one(|s| s.status == *status).await,
        };
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(phone: &str) -> Person {
        Person {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: phone.into(),
        }
    }

    #[tokio::test]
    async fn add_rejects_duplicate_identity() {
        let table = MemTable::<Person>::new();
        let p = person("+100");
        table.add(&p).await.unwrap();
        let err = table.add(&p).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists("person")));
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_row() {
        let table = MemTable::<Person>::new();
        let p = person("+100");
        assert!(matches!(
            table.update(&p).await.unwrap_err(),
            DomainError::NotFound("person")
        ));
        assert!(matches!(
            table.delete(p.id).await.unwrap_err(),
            DomainError::NotFound("person")
        ));

        table.add(&p).await.unwrap();
        let mut changed = p.clone();
        changed.phone = "+200".into();
        table.update(&changed).await.unwrap();
        assert_eq!(table.get(p.id).await.unwrap().unwrap().phone, "+200");
        table.delete(p.id).await.unwrap();
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn find_by_phone_matches_single_row() {
        let table = MemTable::<Person>::new();
        table.add(&person("+111")).await.unwrap();
        table.add(&person("+222")).await.unwrap();
        let hit = table.find_by_phone("+222").await.unwrap().unwrap();
        assert_eq!(hit.phone, "+222");
        assert!(table.find_by_phone("+333").await.unwrap().is_none());
    }
}
