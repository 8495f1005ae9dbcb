//! Person request handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::ExpeditionState;
use crate::dto::{PersonRequest, PersonResponse};
use crate::error::ApiResult;

/// `POST /persons` — create a person.
pub async fn create_person_handler(
    State(state): State<ExpeditionState>,
    Json(body): Json<PersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    let id = body.id.unwrap_or_else(Uuid::new_v4);
    let person = state.persons.create(body.into_person(id)).await?;
    Ok(Json(person.into()))
}

/// `GET /persons` — list persons.
pub async fn list_persons_handler(
    State(state): State<ExpeditionState>,
) -> ApiResult<Json<Vec<PersonResponse>>> {
    let persons = state.persons.list().await?;
    Ok(Json(persons.into_iter().map(PersonResponse::from).collect()))
}

/// `GET /persons/{id}` — fetch one person.
pub async fn get_person_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state.persons.get(id).await?;
    Ok(Json(person.into()))
}

/// `PUT /persons/{id}` — overwrite a person.
pub async fn update_person_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state.persons.update(body.into_person(id)).await?;
    Ok(Json(person.into()))
}

/// `DELETE /persons/{id}` — remove a person.
pub async fn delete_person_handler(
    State(state): State<ExpeditionState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state.persons.delete(id).await?;
    Ok(Json(person.into()))
}

/// `GET /persons/by-phone/{phone}` — lookup by phone number.
pub async fn person_by_phone_handler(
    State(state): State<ExpeditionState>,
    Path(phone): Path<String>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state.persons.find_by_phone(&phone).await?;
    Ok(Json(person.into()))
}

/// `GET /persons/by-email/{email}` — lookup by email.
pub async fn person_by_email_handler(
    State(state): State<ExpeditionState>,
    Path(email): Path<String>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state.persons.find_by_email(&email).await?;
    Ok(Json(person.into()))
}
