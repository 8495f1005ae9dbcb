//! Shipment request handlers.

use axum::Json;
use axum::extract::{Path, State};
use courier_core::models::shipment::{ShipmentFilter, ShipmentStatus};
use uuid::Uuid;

use crate::ShipmentState;
use crate::dto::{CreateShipmentRequest, ShipmentResponse, UpdateShipmentRequest};
use crate::error::{ApiError, ApiResult};

/// `POST /shipments` — create a shipment with derived fields.
pub async fn create_shipment_handler(
    State(state): State<ShipmentState>,
    Json(body): Json<CreateShipmentRequest>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state.shipments.create(body.into()).await?;
    Ok(Json(shipment.into()))
}

/// `GET /shipments` — list shipments.
pub async fn list_shipments_handler(
    State(state): State<ShipmentState>,
) -> ApiResult<Json<Vec<ShipmentResponse>>> {
    let shipments = state.shipments.list().await?;
    Ok(Json(
        shipments.into_iter().map(ShipmentResponse::from).collect(),
    ))
}

/// `GET /shipments/{id}` — fetch one shipment.
pub async fn get_shipment_handler(
    State(state): State<ShipmentState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state.shipments.get(id).await?;
    Ok(Json(shipment.into()))
}

/// `PUT /shipments/{id}` — overwrite the mutable fields.
pub async fn update_shipment_handler(
    State(state): State<ShipmentState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateShipmentRequest>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state.shipments.update(body.into_update(id)).await?;
    Ok(Json(shipment.into()))
}

/// `DELETE /shipments/{id}` — remove a shipment.
pub async fn delete_shipment_handler(
    State(state): State<ShipmentState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state.shipments.delete(id).await?;
    Ok(Json(shipment.into()))
}

/// `GET /shipments/by-tracking/{number}` — lookup by tracking number.
pub async fn shipment_by_tracking_handler(
    State(state): State<ShipmentState>,
    Path(number): Path<String>,
) -> ApiResult<Json<ShipmentResponse>> {
    let shipment = state
        .shipments
        .find_by(ShipmentFilter::TrackingNumber(number))
        .await?;
    Ok(Json(shipment.into()))
}

/// `GET /shipments/by-status/{status}` — first shipment in a status.
pub async fn shipment_by_status_handler(
    State(state): State<ShipmentState>,
    Path(status): Path<String>,
) -> ApiResult<Json<ShipmentResponse>> {
    let status: ShipmentStatus = status.parse().map_err(ApiError::Validation)?;
    let shipment = state
        .shipments
        .find_by(ShipmentFilter::Status(status))
        .await?;
    Ok(Json(shipment.into()))
}
