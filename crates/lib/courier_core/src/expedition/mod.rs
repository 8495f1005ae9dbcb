//! Expedition CRUD services: persons, locations, packages.
//!
//! All three follow the common invariant: create fails `AlreadyExists`
//! when the identity is taken, update and delete fail `NotFound` when
//! it is absent.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::expedition::{Location, Package, Person};
use crate::store::{
    LocationStore, PackageStore, PersonStore, ensure_absent, ensure_present,
};

/// Person CRUD with contact lookups.
pub struct PersonService {
    persons: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(persons: Arc<dyn PersonStore>) -> Self {
        Self { persons }
    }

    pub async fn create(&self, person: Person) -> DomainResult<Person> {
        ensure_absent(self.persons.as_ref(), person.id).await?;
        self.persons.add(&person).await?;
        info!(person_id = %person.id, "person created");
        Ok(person)
    }

    pub async fn update(&self, person: Person) -> DomainResult<Person> {
        ensure_present(self.persons.as_ref(), person.id).await?;
        self.persons.update(&person).await?;
        Ok(person)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<Person> {
        let person = ensure_present(self.persons.as_ref(), id).await?;
        self.persons.delete(id).await?;
        Ok(person)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Person> {
        ensure_present(self.persons.as_ref(), id).await
    }

    pub async fn list(&self) -> DomainResult<Vec<Person>> {
        self.persons.get_all().await
    }

    pub async fn find_by_phone(&self, phone: &str) -> DomainResult<Person> {
        self.persons
            .find_by_phone(phone)
            .await?
            .ok_or(DomainError::NotFound("person"))
    }

    pub async fn find_by_email(&self, email: &str) -> DomainResult<Person> {
        self.persons
            .find_by_email(email)
            .await?
            .ok_or(DomainError::NotFound("person"))
    }
}

/// Location CRUD with a city lookup.
pub struct LocationService {
    locations: Arc<dyn LocationStore>,
}

impl LocationService {
    pub fn new(locations: Arc<dyn LocationStore>) -> Self {
        Self { locations }
    }

    pub async fn create(&self, location: Location) -> DomainResult<Location> {
        ensure_absent(self.locations.as_ref(), location.id).await?;
        self.locations.add(&location).await?;
        info!(location_id = %location.id, "location created");
        Ok(location)
    }

    pub async fn update(&self, location: Location) -> DomainResult<Location> {
        ensure_present(self.locations.as_ref(), location.id).await?;
        self.locations.update(&location).await?;
        Ok(location)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<Location> {
        let location = ensure_present(self.locations.as_ref(), id).await?;
        self.locations.delete(id).await?;
        Ok(location)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Location> {
        ensure_present(self.locations.as_ref(), id).await
    }

    pub async fn list(&self) -> DomainResult<Vec<Location>> {
        self.locations.get_all().await
    }

    pub async fn find_by_city(&self, city: &str) -> DomainResult<Vec<Location>> {
        self.locations.find_by_city(city).await
    }
}

/// Package CRUD with an owner lookup.
pub struct PackageService {
    packages: Arc<dyn PackageStore>,
}

impl PackageService {
    pub fn new(packages: Arc<dyn PackageStore>) -> Self {
        Self { packages }
    }

    pub async fn create(&self, package: Package) -> DomainResult<Package> {
        ensure_absent(self.packages.as_ref(), package.id).await?;
        self.packages.add(&package).await?;
        info!(package_id = %package.id, "package created");
        Ok(package)
    }

    pub async fn update(&self, package: Package) -> DomainResult<Package> {
        ensure_present(self.packages.as_ref(), package.id).await?;
        self.packages.update(&package).await?;
        Ok(package)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<Package> {
        let package = ensure_present(self.packages.as_ref(), id).await?;
        self.packages.delete(id).await?;
        Ok(package)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Package> {
        ensure_present(self.packages.as_ref(), id).await
    }

    pub async fn list(&self) -> DomainResult<Vec<Package>> {
        self.packages.get_all().await
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> DomainResult<Vec<Package>> {
        self.packages.find_by_owner(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemTable;

    fn location(city: &str) -> Location {
        Location {
            id: Uuid::new_v4(),
            street: "1 Main St".into(),
            city: city.into(),
            postal_code: "10001".into(),
            country: "US".into(),
        }
    }

    #[tokio::test]
    async fn create_rejects_existing_identity() {
        let service = LocationService::new(Arc::new(MemTable::<Location>::new()));
        let loc = service.create(location("Oslo")).await.unwrap();
        let err = service.create(loc).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists("location")));
    }

    #[tokio::test]
    async fn update_and_delete_require_existence() {
        let service = LocationService::new(Arc::new(MemTable::<Location>::new()));
        let absent = location("Bergen");
        assert!(matches!(
            service.update(absent.clone()).await.unwrap_err(),
            DomainError::NotFound("location")
        ));
        assert!(matches!(
            service.delete(absent.id).await.unwrap_err(),
            DomainError::NotFound("location")
        ));
    }

    #[tokio::test]
    async fn city_lookup_returns_all_matches() {
        let service = LocationService::new(Arc::new(MemTable::<Location>::new()));
        service.create(location("Oslo")).await.unwrap();
        service.create(location("Oslo")).await.unwrap();
        service.create(location("Bergen")).await.unwrap();
        assert_eq!(service.find_by_city("Oslo").await.unwrap().len(), 2);
        assert!(service.find_by_city("Tromsø").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn person_phone_lookup_fails_not_found_when_absent() {
        let service = PersonService::new(Arc::new(MemTable::<Person>::new()));
        let err = service.find_by_phone("+000").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("person")));
    }

    #[tokio::test]
    async fn packages_filter_by_owner() {
        let service = PackageService::new(Arc::new(MemTable::<Package>::new()));
        let owner = Uuid::new_v4();
        for contents in ["books", "tools"] {
            service
                .create(Package {
                    id: Uuid::new_v4(),
                    weight_kg: 1.5,
                    width_cm: 10.0,
                    height_cm: 10.0,
                    depth_cm: 10.0,
                    contents: contents.into(),
                    owner_id: owner,
                    shipment_id: None,
                })
                .await
                .unwrap();
        }
        assert_eq!(service.find_by_owner(owner).await.unwrap().len(), 2);
        assert!(
            service
                .find_by_owner(Uuid::new_v4())
                .await
                .unwrap()
                .is_empty()
        );
    }
}
