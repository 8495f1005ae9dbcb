//! # courier_api
//!
//! HTTP API library for the Courier services. Each service mounts its
//! own router; the binaries wire a router to a listener and a store.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use courier_core::auth::TokenAuthority;
use courier_core::expedition::{LocationService, PackageService, PersonService};
use courier_core::shipment::ShipmentService;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{auth, health, locations, packages, persons, shipments, users};

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Shared state of the identity service.
#[derive(Clone)]
pub struct IdentityState {
    pub authority: Arc<TokenAuthority>,
}

/// Builds the identity service router: auth endpoints plus protected
/// user-profile CRUD.
pub fn identity_router(state: IdentityState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/refresh", post(auth::refresh_handler));

    let protected = Router::new()
        .route("/auth/claims/{id}", get(auth::claims_handler))
        .route("/users", get(users::list_users_handler))
        .route(
            "/users/{id}",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors())
        .with_state(state)
}

/// Shared state of the expedition service.
#[derive(Clone)]
pub struct ExpeditionState {
    pub persons: Arc<PersonService>,
    pub locations: Arc<LocationService>,
    pub packages: Arc<PackageService>,
}

/// Builds the expedition service router: person, location and package
/// CRUD plus secondary lookups.
pub fn expedition_router(state: ExpeditionState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/persons",
            post(persons::create_person_handler).get(persons::list_persons_handler),
        )
        .route(
            "/persons/{id}",
            get(persons::get_person_handler)
                .put(persons::update_person_handler)
                .delete(persons::delete_person_handler),
        )
        .route(
            "/persons/by-phone/{phone}",
            get(persons::person_by_phone_handler),
        )
        .route(
            "/persons/by-email/{email}",
            get(persons::person_by_email_handler),
        )
        .route(
            "/locations",
            post(locations::create_location_handler).get(locations::list_locations_handler),
        )
        .route(
            "/locations/{id}",
            get(locations::get_location_handler)
                .put(locations::update_location_handler)
                .delete(locations::delete_location_handler),
        )
        .route(
            "/locations/by-city/{city}",
            get(locations::locations_by_city_handler),
        )
        .route(
            "/packages",
            post(packages::create_package_handler).get(packages::list_packages_handler),
        )
        .route(
            "/packages/{id}",
            get(packages::get_package_handler)
                .put(packages::update_package_handler)
                .delete(packages::delete_package_handler),
        )
        .route(
            "/packages/by-owner/{id}",
            get(packages::packages_by_owner_handler),
        )
        .layer(cors())
        .with_state(state)
}

/// Shared state of the shipment service.
#[derive(Clone)]
pub struct ShipmentState {
    pub shipments: Arc<ShipmentService>,
}

/// Builds the shipment service router: shipment CRUD plus lookups.
pub fn shipment_router(state: ShipmentState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/shipments",
            post(shipments::create_shipment_handler).get(shipments::list_shipments_handler),
        )
        .route(
            "/shipments/{id}",
            get(shipments::get_shipment_handler)
                .put(shipments::update_shipment_handler)
                .delete(shipments::delete_shipment_handler),
        )
        .route(
            "/shipments/by-tracking/{number}",
            get(shipments::shipment_by_tracking_handler),
        )
        .route(
            "/shipments/by-status/{status}",
            get(shipments::shipment_by_status_handler),
        )
        .layer(cors())
        .with_state(state)
}
