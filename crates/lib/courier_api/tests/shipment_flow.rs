//! Integration test — shipment router over the in-memory stores,
//! covering the derived fields and the secondary lookups.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use courier_api::{ShipmentState, shipment_router};
use courier_core::models::expedition::Package;
use courier_core::models::shipment::Shipment;
use courier_core::shipment::ShipmentService;
use courier_core::store::EntityStore;
use courier_core::store::memory::MemTable;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn app_with_package(weight_kg: f64) -> (Router, Uuid) {
    let packages = Arc::new(MemTable::<Package>::new());
    let package_id = Uuid::now_v7();
    packages
        .add(&Package {
            id: package_id,
            weight_kg,
            width_cm: 40.0,
            height_cm: 30.0,
            depth_cm: 20.0,
            contents: "ceramics".into(),
            owner_id: Uuid::now_v7(),
            shipment_id: None,
        })
        .await
        .expect("seed package");

    let service = ShipmentService::new(Arc::new(MemTable::<Shipment>::new()), packages);
    let router = shipment_router(ShipmentState {
        shipments: Arc::new(service),
    });
    (router, package_id)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

fn create_body(package_id: Uuid) -> Value {
    json!({
        "packageId": package_id,
        "pickupLocationId": Uuid::now_v7(),
        "destinationLocationId": Uuid::now_v7(),
        "senderId": Uuid::now_v7(),
        "recipientId": Uuid::now_v7(),
    })
}

#[tokio::test]
async fn creating_a_shipment_derives_its_fields() {
    let (app, package_id) = app_with_package(5.0).await;

    let resp = app
        .clone()
        .oneshot(post_json("/shipments", create_body(package_id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let shipment = json_body(resp).await;

    assert_eq!(shipment["cost"], 50.0);
    assert_eq!(shipment["status"], "Received");
    assert_eq!(shipment["deliveryMethod"], "Standard");
    assert!(shipment["deliveredAt"].is_null());

    let tracking = shipment["trackingNumber"].as_str().unwrap();
    assert_eq!(tracking.len(), 12);
    assert!(tracking[..2].chars().all(|c| c.is_ascii_uppercase()));
    assert!(tracking[2..10].chars().all(|c| c.is_ascii_digit()));
    assert!(tracking[10..].chars().all(|c| c.is_ascii_uppercase()));

    // The tracking lookup finds it again.
    let resp = app
        .oneshot(get(&format!("/shipments/by-tracking/{tracking}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let hit = json_body(resp).await;
    assert_eq!(hit["id"], shipment["id"]);
}

#[tokio::test]
async fn unknown_package_fails_the_create() {
    let (app, _) = app_with_package(5.0).await;

    let resp = app
        .oneshot(post_json("/shipments", create_body(Uuid::now_v7())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_overwrites_the_mutable_fields() {
    let (app, package_id) = app_with_package(2.0).await;

    let resp = app
        .clone()
        .oneshot(post_json("/shipments", create_body(package_id)))
        .await
        .unwrap();
    let shipment = json_body(resp).await;
    let id = shipment["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(put_json(
            &format!("/shipments/{id}"),
            json!({
                "cost": 99.5,
                "deliveryMethod": "Express",
                "deliveredAt": null,
                "status": "InTransit",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await;
    assert_eq!(updated["cost"], 99.5);
    assert_eq!(updated["deliveryMethod"], "Express");
    assert_eq!(updated["status"], "InTransit");
    // Derived fields survive the update.
    assert_eq!(updated["trackingNumber"], shipment["trackingNumber"]);

    let resp = app
        .clone()
        .oneshot(get("/shipments/by-status/InTransit"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Updating a deleted shipment reports not found.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/shipments/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(put_json(
            &format!("/shipments/{id}"),
            json!({
                "cost": 1.0,
                "deliveryMethod": "Standard",
                "deliveredAt": null,
                "status": "Received",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_status_lookup_is_a_validation_error() {
    let (app, _) = app_with_package(1.0).await;

    let resp = app
        .oneshot(get("/shipments/by-status/Teleported"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
