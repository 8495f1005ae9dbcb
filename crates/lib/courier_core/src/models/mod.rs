//! Domain models.
//!
//! These are internal domain models, distinct from the API wire DTOs
//! (which carry `#[serde(rename_all = "camelCase")]` etc.).

pub mod auth;
pub mod expedition;
pub mod shipment;
