//! User profile request handlers. All require authentication.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::IdentityState;
use crate::dto::{UpdateUserRequest, UserResponse};
use crate::error::ApiResult;

/// `GET /users` — list users.
pub async fn list_users_handler(
    State(state): State<IdentityState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.authority.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `GET /users/{id}` — fetch one user.
pub async fn get_user_handler(
    State(state): State<IdentityState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.authority.get_user(id).await?;
    Ok(Json(user.into()))
}

/// `PUT /users/{id}` — overwrite profile fields.
pub async fn update_user_handler(
    State(state): State<IdentityState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.authority.update_user(body.into_update(id)).await?;
    Ok(Json(user.into()))
}

/// `DELETE /users/{id}` — remove a user.
pub async fn delete_user_handler(
    State(state): State<IdentityState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.authority.delete_user(id).await?;
    Ok(Json(user.into()))
}
