//! Expedition domain models: persons, locations, packages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact record referenced by packages and shipments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Address record referenced by shipments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A package owned by a person, optionally linked to a shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    /// Weight in kilograms; drives the shipment tariff.
    pub weight_kg: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub depth_cm: f64,
    pub contents: String,
    pub owner_id: Uuid,
    pub shipment_id: Option<Uuid>,
}
