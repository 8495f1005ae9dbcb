//! Location request handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::ExpeditionState;
use crate::dto::{LocationRequest, LocationResponse};
use crate::error::ApiResult;

/// `POST /locations` — create a location.
pub async fn create_location_handler(
    State(state): State<ExpeditionState>,
    Json(body): Json<LocationRequest>,
) -> ApiResult<Json<LocationResponse>> {
    let id = body.id.unwrap_or_else(Uuid::new_v4);
    let location = state.locations.create(body.into_location(id)).await?;
    Ok(Json(location.into()))
}

/// `GET /locations` — list locations.
pub async fn list_locations_handler(
    State(state): State<ExpeditionState>,
) -> ApiResult<Json<Vec<LocationResponse>>> {
    let locations = state.locations.list().await?;
    Ok(Json(
        locations.into_iter().map(LocationResponse::from).collect(),
    ))
}

/// `GET /locations/{id}` — fetch one location.
pub async fn get_location_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LocationResponse>> {
    let location = state.locations.get(id).await?;
    Ok(Json(location.into()))
}

/// `PUT /locations/{id}` — overwrite a location.
pub async fn update_location_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
    Json(body): Json<LocationRequest>,
) -> ApiResult<Json<LocationResponse>> {
    let location = state.locations.update(body.into_location(id)).await?;
    Ok(Json(location.into()))
}

/// `DELETE /locations/{id}` — remove a location.
pub async fn delete_location_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LocationResponse>> {
    let location = state.locations.delete(id).await?;
    Ok(Json(location.into()))
}

/// `GET /locations/by-city/{city}` — all locations in a city.
pub async fn locations_by_city_handler(
    State(state): State<ExpeditionState>,
    Path(city): Path<String>,
) -> ApiResult<Json<Vec<LocationResponse>>> {
    let locations = state.locations.find_by_city(&city).await?;
    Ok(Json(
        locations.into_iter().map(LocationResponse::from).collect(),
    ))
}
