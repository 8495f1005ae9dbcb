//! Authentication request handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::IdentityState;
use crate::dto::{
    ClaimsResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenResponse, UserResponse,
};
use crate::error::ApiResult;

/// `POST /auth/register` — create a new user account.
pub async fn register_handler(
    State(state): State<IdentityState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.authority.register(body.into()).await?;
    Ok(Json(user.into()))
}

/// `POST /auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<IdentityState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let pair = state.authority.authorize(&body.email, &body.password).await?;
    Ok(Json(pair.into()))
}

/// `POST /auth/refresh` — exchange a refresh token for a new pair.
pub async fn refresh_handler(
    State(state): State<IdentityState>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let pair = state.authority.refresh(&body.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// `GET /auth/claims/{id}` — claim set for a user. Requires authentication.
pub async fn claims_handler(
    State(state): State<IdentityState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ClaimsResponse>> {
    let claims = state.authority.user_claims(user_id).await?;
    Ok(Json(claims.into()))
}
