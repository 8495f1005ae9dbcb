//! Package request handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::ExpeditionState;
use crate::dto::{PackageRequest, PackageResponse};
use crate::error::ApiResult;

/// `POST /packages` — create a package.
pub async fn create_package_handler(
    State(state): State<ExpeditionState>,
    Json(body): Json<PackageRequest>,
) -> ApiResult<Json<PackageResponse>> {
    let id = body.id.unwrap_or_else(Uuid::new_v4);
    let package = state.packages.create(body.into_package(id)).await?;
    Ok(Json(package.into()))
}

/// `GET /packages` — list packages.
pub async fn list_packages_handler(
    State(state): State<ExpeditionState>,
) -> ApiResult<Json<Vec<PackageResponse>>> {
    let packages = state.packages.list().await?;
    Ok(Json(
        packages.into_iter().map(PackageResponse::from).collect(),
    ))
}

/// `GET /packages/{id}` — fetch one package.
pub async fn get_package_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PackageResponse>> {
    let package = state.packages.get(id).await?;
    Ok(Json(package.into()))
}

/// `PUT /packages/{id}` — overwrite a package.
pub async fn update_package_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PackageRequest>,
) -> ApiResult<Json<PackageResponse>> {
    let package = state.packages.update(body.into_package(id)).await?;
    Ok(Json(package.into()))
}

/// `DELETE /packages/{id}` — remove a package.
pub async fn delete_package_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PackageResponse>> {
    let package = state.packages.delete(id).await?;
    Ok(Json(package.into()))
}

/// `GET /packages/by-owner/{id}` — all packages owned by a person.
pub async fn packages_by_owner_handler(
    State(state): State<ExpeditionState>,
    Path(owner_id): Path<Uuid>,
) -> ApiResult<Json<Vec<PackageResponse>>> {
    let packages = state.packages.find_by_owner(owner_id).await?;
    Ok(Json(
        packages.into_iter().map(PackageResponse::from).collect(),
    ))
}
