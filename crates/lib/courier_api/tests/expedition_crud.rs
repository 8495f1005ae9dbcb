//! Integration test — expedition router over the in-memory stores.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use courier_api::{ExpeditionState, expedition_router};
use courier_core::expedition::{LocationService, PackageService, PersonService};
use courier_core::models::expedition::{Location, Package, Person};
use courier_core::store::memory::MemTable;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    expedition_router(ExpeditionState {
        persons: Arc::new(PersonService::new(Arc::new(MemTable::<Person>::new()))),
        locations: Arc::new(LocationService::new(Arc::new(MemTable::<Location>::new()))),
        packages: Arc::new(PackageService::new(Arc::new(MemTable::<Package>::new()))),
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
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

#[tokio::test]
async fn person_crud_and_phone_lookup() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/persons",
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "+4411",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let person = json_body(resp).await;
    let id = person["id"].as_str().unwrap().to_string();

    let resp = app.clone().oneshot(get(&format!("/persons/{id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(get("/persons/by-phone/+4411"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let hit = json_body(resp).await;
    assert_eq!(hit["firstName"], "Ada");

    let resp = app
        .clone()
        .oneshot(get("/persons/by-phone/+0000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Recreating the same identity conflicts.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/persons",
            json!({
                "id": id,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "+4411",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Delete, then a second delete reports not found.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/persons/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/persons/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn locations_filter_by_city() {
    let app = app();
    for (street, city) in [("1 Fjord Way", "Oslo"), ("2 Fjord Way", "Oslo"), ("9 Pier Rd", "Bergen")] {
        let resp = app
            .clone()
            .oneshot(post_json(
                "/locations",
                json!({
                    "street": street,
                    "city": city,
                    "postalCode": "0150",
                    "country": "NO",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .clone()
        .oneshot(get("/locations/by-city/Oslo"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let hits = json_body(resp).await;
    assert_eq!(hits.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn packages_track_their_owner() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/persons",
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "phone": "+4411",
            }),
        ))
        .await
        .unwrap();
    let owner = json_body(resp).await;
    let owner_id = owner["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/packages",
            json!({
                "weightKg": 2.5,
                "widthCm": 30.0,
                "heightCm": 20.0,
                "depthCm": 10.0,
                "contents": "books",
                "ownerId": owner_id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(get(&format!("/packages/by-owner/{owner_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let hits = json_body(resp).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["contents"], "books");
}
