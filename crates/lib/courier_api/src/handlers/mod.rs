//! Request handlers for the three services.

pub mod auth;
pub mod health;
pub mod locations;
pub mod packages;
pub mod persons;
pub mod shipments;
pub mod users;
