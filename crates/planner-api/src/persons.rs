//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | Ordered by id |
//! | `POST`   | `/persons` | Body: `{"name":"...","working_hours":40}`; returns 201 |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `PUT`    | `/persons/:id` | Partial update; `working_hours: null` clears |
//! | `DELETE` | `/persons/:id` | Cascades to managed projects and assignments |
//! | `GET`    | `/persons/:id/assignments` | 404 if the person is missing |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use planner_core::{
  EntityKind, Error as CoreError,
  assignment::Assignment,
  person::Person,
  store::PlannerStore,
  validate,
};
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{EntityId, json_object},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let persons = store
    .list_persons()
    .await
    .map_err(ApiError::store("Could not retrieve persons"))?;
  Ok(Json(persons))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create<S: PlannerStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let input = validate::new_person(&json_object(body)?)?;
  let person = store
    .create_person(input)
    .await
    .map_err(ApiError::store("Could not create person"))?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Person>, ApiError> {
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::store("Could not retrieve person"))?
    .ok_or_else(|| CoreError::missing(EntityKind::Person))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/:id`
pub async fn update<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
  let patch = match json_object(body).and_then(|b| Ok(validate::person_patch(&b)?)) {
    Ok(patch) => patch,
    Err(invalid) => {
      // A missing target outranks a bad body.
      store
        .get_person(id)
        .await
        .map_err(ApiError::store("Could not update person"))?
        .ok_or_else(|| CoreError::missing(EntityKind::Person))?;
      return Err(invalid);
    }
  };
  let person = store
    .update_person(id, patch)
    .await
    .map_err(ApiError::store("Could not update person"))?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id`
pub async fn delete<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Value>, ApiError> {
  store
    .delete_person(id)
    .await
    .map_err(ApiError::store("Could not delete person"))?;
  Ok(Json(json!({ "message": "Person deleted" })))
}

// ─── Assignments ──────────────────────────────────────────────────────────────

/// `GET /persons/:id/assignments`
pub async fn assignments<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Vec<Assignment>>, ApiError> {
  let assignments = store
    .list_assignments_for_person(id)
    .await
    .map_err(ApiError::store("Could not retrieve assignments"))?;
  Ok(Json(assignments))
}
