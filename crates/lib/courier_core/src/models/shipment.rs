//! Shipment domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shipment status. Updates are not transition-guarded: any status may
/// be set to any other (the CRUD layer trusts the caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Received,
    InProcess,
    Shipped,
    InTransit,
    Arrived,
    ReadyForPickUp,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Received => "Received",
            ShipmentStatus::InProcess => "InProcess",
            ShipmentStatus::Shipped => "Shipped",
            ShipmentStatus::InTransit => "InTransit",
            ShipmentStatus::Arrived => "Arrived",
            ShipmentStatus::ReadyForPickUp => "ReadyForPickUp",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Received" => Ok(ShipmentStatus::Received),
            "InProcess" => Ok(ShipmentStatus::InProcess),
            "Shipped" => Ok(ShipmentStatus::Shipped),
            "InTransit" => Ok(ShipmentStatus::InTransit),
            "Arrived" => Ok(ShipmentStatus::Arrived),
            "ReadyForPickUp" => Ok(ShipmentStatus::ReadyForPickUp),
            other => Err(format!("unknown shipment status: {other}")),
        }
    }
}

/// Delivery method. New shipments default to `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryMethod {
    #[default]
    Standard,
    Express,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Standard => "Standard",
            DeliveryMethod::Express => "Express",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Standard" => Ok(DeliveryMethod::Standard),
            "Express" => Ok(DeliveryMethod::Express),
            other => Err(format!("unknown delivery method: {other}")),
        }
    }
}

/// A shipment linking one package, two locations and two persons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub package_id: Uuid,
    pub pickup_location_id: Uuid,
    pub destination_location_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    /// System-generated, unique, `[A-Z]{2}[0-9]{8}[A-Z]{2}`.
    pub tracking_number: String,
    pub pickup_at: DateTime<Utc>,
    pub delivery_method: DeliveryMethod,
    pub estimated_delivery_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cost: f64,
    pub status: ShipmentStatus,
}

/// Input for shipment creation. Derived fields (tracking number, pickup
/// time, cost, estimate, status, method) are computed by the lifecycle
/// engine, not supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewShipment {
    /// Caller-supplied identity, or `None` to have one generated.
    pub id: Option<Uuid>,
    pub package_id: Uuid,
    pub pickup_location_id: Uuid,
    pub destination_location_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
}

/// The mutable fields a shipment update overwrites.
#[derive(Debug, Clone)]
pub struct ShipmentUpdate {
    pub id: Uuid,
    pub cost: f64,
    pub delivery_method: DeliveryMethod,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: ShipmentStatus,
}

/// Single-field equality lookup against the shipment store — the one
/// parameterized predicate primitive behind every secondary accessor.
#[derive(Debug, Clone)]
pub enum ShipmentFilter {
    TrackingNumber(String),
    PickupAt(DateTime<Utc>),
    DeliveredAt(DateTime<Utc>),
    Cost(f64),
    Status(ShipmentStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            ShipmentStatus::Received,
            ShipmentStatus::InProcess,
            ShipmentStatus::Shipped,
            ShipmentStatus::InTransit,
            ShipmentStatus::Arrived,
            ShipmentStatus::ReadyForPickUp,
        ] {
            assert_eq!(status.as_str().parse::<ShipmentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn default_delivery_method_is_standard() {
        assert_eq!(DeliveryMethod::default(), DeliveryMethod::Standard);
    }
}
