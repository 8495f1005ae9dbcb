//! Shipment lifecycle engine.
//!
//! Computes the derived fields on creation (tracking number, pickup
//! time, tariff cost, estimated delivery, initial status) and enforces
//! the existence invariants on mutation. Status updates are not
//! transition-guarded.

pub mod tracking;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::shipment::{
    DeliveryMethod, NewShipment, Shipment, ShipmentFilter, ShipmentStatus, ShipmentUpdate,
};
use crate::store::{PackageStore, ShipmentStore, ensure_absent, ensure_present};

/// Flat linear tariff: currency units per kilogram.
pub const TARIFF_PER_KG: f64 = 10.0;

/// Estimated delivery window after pickup.
pub const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Shipment cost under the flat tariff.
pub fn shipment_cost(weight_kg: f64) -> f64 {
    weight_kg * TARIFF_PER_KG
}

/// The shipment service's domain core.
pub struct ShipmentService {
    shipments: Arc<dyn ShipmentStore>,
    packages: Arc<dyn PackageStore>,
}

impl ShipmentService {
    pub fn new(shipments: Arc<dyn ShipmentStore>, packages: Arc<dyn PackageStore>) -> Self {
        Self {
            shipments,
            packages,
        }
    }

    /// Create a shipment, deriving in order: tracking number, pickup
    /// timestamp (now UTC), estimated delivery (pickup + 7 days), cost
    /// from the referenced package's weight, initial `Received` status
    /// and the default delivery method.
    pub async fn create(&self, new: NewShipment) -> DomainResult<Shipment> {
        let id = match new.id {
            Some(id) => {
                ensure_absent(self.shipments.as_ref(), id).await?;
                id
            }
            None => Uuid::now_v7(),
        };

        // Cost derives from the real package weight.
        let package = ensure_present(self.packages.as_ref(), new.package_id).await?;

        let mut rng = SmallRng::from_os_rng();
        let pickup_at = Utc::now();
        let shipment = Shipment {
            id,
            package_id: new.package_id,
            pickup_location_id: new.pickup_location_id,
            destination_location_id: new.destination_location_id,
            sender_id: new.sender_id,
            recipient_id: new.recipient_id,
            tracking_number: tracking::tracking_number(&mut rng),
            pickup_at,
            delivery_method: DeliveryMethod::default(),
            estimated_delivery_at: pickup_at + Duration::days(DELIVERY_WINDOW_DAYS),
            delivered_at: None,
            cost: shipment_cost(package.weight_kg),
            status: ShipmentStatus::Received,
        };
        self.shipments.add(&shipment).await?;
        info!(
            shipment_id = %shipment.id,
            tracking_number = %shipment.tracking_number,
            "shipment created"
        );
        Ok(shipment)
    }

    /// Overwrite the mutable fields (cost, delivery method, actual
    /// delivery date, status). Any status may be set; the engine trusts
    /// the caller. Persistence failures are wrapped with their message.
    pub async fn update(&self, update: ShipmentUpdate) -> DomainResult<Shipment> {
        let mut shipment = ensure_present(self.shipments.as_ref(), update.id).await?;
        shipment.cost = update.cost;
        shipment.delivery_method = update.delivery_method;
        shipment.delivered_at = update.delivered_at;
        shipment.status = update.status;
        self.shipments
            .update(&shipment)
            .await
            .map_err(|e| match e {
                DomainError::NotFound(kind) => DomainError::NotFound(kind),
                other => DomainError::Persistence(other.to_string()),
            })?;
        Ok(shipment)
    }

    /// Remove a shipment, returning the removed record.
    pub async fn delete(&self, id: Uuid) -> DomainResult<Shipment> {
        let shipment = ensure_present(self.shipments.as_ref(), id).await?;
        self.shipments.delete(id).await?;
        info!(shipment_id = %id, "shipment deleted");
        Ok(shipment)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Shipment> {
        ensure_present(self.shipments.as_ref(), id).await
    }

    pub async fn list(&self) -> DomainResult<Vec<Shipment>> {
        self.shipments.get_all().await
    }

    /// Single-field equality lookup; `NotFound` when nothing matches.
    pub async fn find_by(&self, filter: ShipmentFilter) -> DomainResult<Shipment> {
        self.shipments
            .find_one(&filter)
            .await?
            .ok_or(DomainError::NotFound("shipment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expedition::Package;
    use crate::store::EntityStore;
    use crate::store::memory::MemTable;
    use chrono::DateTime;

    struct Fixture {
        service: ShipmentService,
        shipments: Arc<MemTable<Shipment>>,
        package_id: Uuid,
    }

    async fn fixture_with_weight(weight_kg: f64) -> Fixture {
        let shipments = Arc::new(MemTable::<Shipment>::new());
        let packages = Arc::new(MemTable::<Package>::new());
        let package = Package {
            id: Uuid::new_v4(),
            weight_kg,
            width_cm: 30.0,
            height_cm: 20.0,
            depth_cm: 10.0,
            contents: "books".into(),
            owner_id: Uuid::new_v4(),
            shipment_id: None,
        };
        packages.add(&package).await.unwrap();
        Fixture {
            service: ShipmentService::new(shipments.clone(), packages),
            shipments,
            package_id: package.id,
        }
    }

    fn new_shipment(package_id: Uuid, id: Option<Uuid>) -> NewShipment {
        NewShipment {
            id,
            package_id,
            pickup_location_id: Uuid::new_v4(),
            destination_location_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn creation_derives_cost_estimate_and_initial_status() {
        let fx = fixture_with_weight(5.0).await;
        let shipment = fx
            .service
            .create(new_shipment(fx.package_id, None))
            .await
            .unwrap();

        assert_eq!(shipment.cost, 50.0);
        assert_eq!(
            shipment.estimated_delivery_at,
            shipment.pickup_at + Duration::days(7)
        );
        assert_eq!(shipment.status, ShipmentStatus::Received);
        assert_eq!(shipment.delivery_method, DeliveryMethod::Standard);
        assert!(shipment.delivered_at.is_none());

        // The returned record reflects what was persisted.
        let stored = fx.shipments.get(shipment.id).await.unwrap().unwrap();
        assert_eq!(stored.tracking_number, shipment.tracking_number);
        assert_eq!(stored.cost, 50.0);
    }

    #[tokio::test]
    async fn tracking_numbers_have_the_fixed_shape() {
        let fx = fixture_with_weight(1.0).await;
        for _ in 0..20 {
            let shipment = fx
                .service
                .create(new_shipment(fx.package_id, None))
                .await
                .unwrap();
            let n = &shipment.tracking_number;
            assert_eq!(n.len(), 12);
            assert!(n[..2].chars().all(|c| c.is_ascii_uppercase()));
            assert!(n[2..10].chars().all(|c| c.is_ascii_digit()));
            assert!(n[10..].chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[tokio::test]
    async fn create_with_taken_id_fails_and_writes_nothing() {
        let fx = fixture_with_weight(2.0).await;
        let id = Uuid::new_v4();
        fx.service
            .create(new_shipment(fx.package_id, Some(id)))
            .await
            .unwrap();

        let err = fx
            .service
            .create(new_shipment(fx.package_id, Some(id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists("shipment")));
        assert_eq!(fx.shipments.len().await, 1);
    }

    #[tokio::test]
    async fn create_with_missing_package_fails() {
        let fx = fixture_with_weight(2.0).await;
        let err = fx
            .service
            .create(new_shipment(Uuid::new_v4(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("package")));
        assert!(fx.shipments.is_empty().await);
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields_without_transition_guard() {
        let fx = fixture_with_weight(3.0).await;
        let shipment = fx
            .service
            .create(new_shipment(fx.package_id, None))
            .await
            .unwrap();

        let delivered_at = DateTime::parse_from_rfc3339("2026-09-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        // Jumping straight from Received to ReadyForPickUp is allowed.
        let updated = fx
            .service
            .update(ShipmentUpdate {
                id: shipment.id,
                cost: 99.5,
                delivery_method: DeliveryMethod::Express,
                delivered_at: Some(delivered_at),
                status: ShipmentStatus::ReadyForPickUp,
            })
            .await
            .unwrap();

        assert_eq!(updated.cost, 99.5);
        assert_eq!(updated.delivery_method, DeliveryMethod::Express);
        assert_eq!(updated.delivered_at, Some(delivered_at));
        assert_eq!(updated.status, ShipmentStatus::ReadyForPickUp);
        // Derived creation fields stay put.
        assert_eq!(updated.tracking_number, shipment.tracking_number);
        assert_eq!(updated.pickup_at, shipment.pickup_at);
    }

    #[tokio::test]
    async fn update_and_delete_of_absent_id_fail_without_writes() {
        let fx = fixture_with_weight(3.0).await;
        let err = fx
            .service
            .update(ShipmentUpdate {
                id: Uuid::new_v4(),
                cost: 1.0,
                delivery_method: DeliveryMethod::Standard,
                delivered_at: None,
                status: ShipmentStatus::Shipped,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("shipment")));

        let err = fx.service.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("shipment")));
        assert!(fx.shipments.is_empty().await);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_shipment() {
        let fx = fixture_with_weight(4.0).await;
        let shipment = fx
            .service
            .create(new_shipment(fx.package_id, None))
            .await
            .unwrap();
        let removed = fx.service.delete(shipment.id).await.unwrap();
        assert_eq!(removed.id, shipment.id);
        assert!(fx.shipments.is_empty().await);
    }

    #[tokio::test]
    async fn lookups_use_one_filter_primitive() {
        let fx = fixture_with_weight(5.0).await;
        let shipment = fx
            .service
            .create(new_shipment(fx.package_id, None))
            .await
            .unwrap();

        let by_tracking = fx
            .service
            .find_by(ShipmentFilter::TrackingNumber(
                shipment.tracking_number.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(by_tracking.id, shipment.id);

        let by_status = fx
            .service
            .find_by(ShipmentFilter::Status(ShipmentStatus::Received))
            .await
            .unwrap();
        assert_eq!(by_status.id, shipment.id);

        let by_cost = fx.service.find_by(ShipmentFilter::Cost(50.0)).await.unwrap();
        assert_eq!(by_cost.id, shipment.id);

        let err = fx
            .service
            .find_by(ShipmentFilter::TrackingNumber("ZZ00000000ZZ".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("shipment")));
    }

    #[test]
    fn tariff_is_linear_in_weight() {
        assert_eq!(shipment_cost(5.0), 50.0);
        assert_eq!(shipment_cost(0.5), 5.0);
        assert_eq!(shipment_cost(0.0), 0.0);
    }
}
