//! Wire DTOs for the three services.
//!
//! Requests and responses use camelCase on the wire; conversions map
//! them to and from the internal domain models.

use chrono::{DateTime, Utc};
use courier_core::models::auth::{NewUser, TokenClaims, TokenPair, User, UserUpdate};
use courier_core::models::expedition::{Location, Package, Person};
use courier_core::models::shipment::{
    DeliveryMethod, NewShipment, Shipment, ShipmentStatus, ShipmentUpdate,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(r: RegisterRequest) -> Self {
        NewUser {
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_in_minutes: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(p: TokenPair) -> Self {
        TokenResponse {
            access_token: p.access_token,
            refresh_token: p.refresh_token,
            refresh_expires_in_minutes: p.refresh_expires_in_minutes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            email: u.email,
            role: u.role.as_str().to_string(),
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// When present, the stored password hash is replaced.
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update(self, id: Uuid) -> UserUpdate {
        UserUpdate {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            password: self.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsResponse {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub given_name: String,
}

impl From<TokenClaims> for ClaimsResponse {
    fn from(c: TokenClaims) -> Self {
        ClaimsResponse {
            sub: c.sub,
            email: c.email,
            role: c.role,
            given_name: c.given_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Expedition
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    /// Caller-supplied identity, or omitted to have one generated.
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl PersonRequest {
    pub fn into_person(self, id: Uuid) -> Person {
        Person {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub id: Option<Uuid>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl LocationRequest {
    pub fn into_location(self, id: Uuid) -> Location {
        Location {
            id,
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
    pub id: Option<Uuid>,
    pub weight_kg: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub depth_cm: f64,
    pub contents: String,
    pub owner_id: Uuid,
    pub shipment_id: Option<Uuid>,
}

impl PackageRequest {
    pub fn into_package(self, id: Uuid) -> Package {
        Package {
            id,
            weight_kg: self.weight_kg,
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            depth_cm: self.depth_cm,
            contents: self.contents,
            owner_id: self.owner_id,
            shipment_id: self.shipment_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        PersonResponse {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: Uuid,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<Location> for LocationResponse {
    fn from(l: Location) -> Self {
        LocationResponse {
            id: l.id,
            street: l.street,
            city: l.city,
            postal_code: l.postal_code,
            country: l.country,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    pub id: Uuid,
    pub weight_kg: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub depth_cm: f64,
    pub contents: String,
    pub owner_id: Uuid,
    pub shipment_id: Option<Uuid>,
}

impl From<Package> for PackageResponse {
    fn from(p: Package) -> Self {
        PackageResponse {
            id: p.id,
            weight_kg: p.weight_kg,
            width_cm: p.width_cm,
            height_cm: p.height_cm,
            depth_cm: p.depth_cm,
            contents: p.contents,
            owner_id: p.owner_id,
            shipment_id: p.shipment_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Shipments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub id: Option<Uuid>,
    pub package_id: Uuid,
    pub pickup_location_id: Uuid,
    pub destination_location_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
}

impl From<CreateShipmentRequest> for NewShipment {
    fn from(r: CreateShipmentRequest) -> Self {
        NewShipment {
            id: r.id,
            package_id: r.package_id,
            pickup_location_id: r.pickup_location_id,
            destination_location_id: r.destination_location_id,
            sender_id: r.sender_id,
            recipient_id: r.recipient_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentRequest {
    pub cost: f64,
    pub delivery_method: DeliveryMethod,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: ShipmentStatus,
}

impl UpdateShipmentRequest {
    pub fn into_update(self, id: Uuid) -> ShipmentUpdate {
        ShipmentUpdate {
            id,
            cost: self.cost,
            delivery_method: self.delivery_method,
            delivered_at: self.delivered_at,
            status: self.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub package_id: Uuid,
    pub pickup_location_id: Uuid,
    pub destination_location_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub tracking_number: String,
    pub pickup_at: DateTime<Utc>,
    pub delivery_method: DeliveryMethod,
    pub estimated_delivery_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cost: f64,
    pub status: ShipmentStatus,
}

impl From<Shipment> for ShipmentResponse {
    fn from(s: Shipment) -> Self {
        ShipmentResponse {
            id: s.id,
            package_id: s.package_id,
            pickup_location_id: s.pickup_location_id,
            destination_location_id: s.destination_location_id,
            sender_id: s.sender_id,
            recipient_id: s.recipient_id,
            tracking_number: s.tracking_number,
            pickup_at: s.pickup_at,
            delivery_method: s.delivery_method,
            estimated_delivery_at: s.estimated_delivery_at,
            delivered_at: s.delivered_at,
            cost: s.cost,
            status: s.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
