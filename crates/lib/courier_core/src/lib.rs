//! # courier_core
//!
//! Core domain logic for the Courier services: the token authority,
//! the shipment lifecycle engine, expedition CRUD, and the persistence
//! gateway they all sit on.

pub mod auth;
pub mod error;
pub mod expedition;
pub mod migrate;
pub mod models;
pub mod shipment;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
