//! Handlers for `/assignments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assignments` | Ordered by id |
//! | `POST`   | `/assignments` | All five fields required; returns 201 |
//! | `GET`    | `/assignments/:id` | 404 if not found |
//! | `PUT`    | `/assignments/:id` | Window checked against the merged record |
//! | `DELETE` | `/assignments/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use planner_core::{
  EntityKind, Error as CoreError, assignment::Assignment, store::PlannerStore, validate,
};
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{EntityId, json_object},
};

/// `GET /assignments`
pub async fn list<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
  let assignments = store
    .list_assignments()
    .await
    .map_err(ApiError::store("Could not retrieve assignments"))?;
  Ok(Json(assignments))
}

/// `POST /assignments`
pub async fn create<S: PlannerStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let input = validate::new_assignment(&json_object(body)?)?;
  let assignment = store
    .create_assignment(input)
    .await
    .map_err(ApiError::store("Could not create assignment"))?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

/// `GET /assignments/:id`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Assignment>, ApiError> {
  let assignment = store
    .get_assignment(id)
    .await
    .map_err(ApiError::store("Could not retrieve assignment"))?
    .ok_or_else(|| CoreError::missing(EntityKind::Assignment))?;
  Ok(Json(assignment))
}

/// `PUT /assignments/:id`
pub async fn update<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Assignment>, ApiError> {
  let patch = match json_object(body).and_then(|b| Ok(validate::assignment_patch(&b)?)) {
    Ok(patch) => patch,
    Err(invalid) => {
      // A missing target outranks a bad body.
      store
        .get_assignment(id)
        .await
        .map_err(ApiError::store("Could not update assignment"))?
        .ok_or_else(|| CoreError::missing(EntityKind::Assignment))?;
      return Err(invalid);
    }
  };
  let assignment = store
    .update_assignment(id, patch)
    .await
    .map_err(ApiError::store("Could not update assignment"))?;
  Ok(Json(assignment))
}

/// `DELETE /assignments/:id`
pub async fn delete<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Value>, ApiError> {
  store
    .delete_assignment(id)
    .await
    .map_err(ApiError::store("Could not delete assignment"))?;
  Ok(Json(json!({ "message": "Assignment deleted" })))
}
