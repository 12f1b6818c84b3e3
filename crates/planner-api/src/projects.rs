//! Handlers for `/projects` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/projects` | Ordered by id |
//! | `POST`   | `/projects` | 404 if `project_manager_id` names no person |
//! | `GET`    | `/projects/:id` | 404 if not found |
//! | `PUT`    | `/projects/:id` | Partial update; `budget: null` clears |
//! | `DELETE` | `/projects/:id` | Cascades to the project's assignments |
//! | `GET`    | `/projects/:id/assignments` | 404 if the project is missing |

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
  project::Project,
  store::PlannerStore,
  validate,
};
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{EntityId, json_object},
};

/// `GET /projects`
pub async fn list<S: PlannerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Project>>, ApiError> {
  let projects = store
    .list_projects()
    .await
    .map_err(ApiError::store("Could not retrieve projects"))?;
  Ok(Json(projects))
}

/// `POST /projects`
pub async fn create<S: PlannerStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let input = validate::new_project(&json_object(body)?)?;
  let project = store
    .create_project(input)
    .await
    .map_err(ApiError::store("Could not create project"))?;
  Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects/:id`
pub async fn get_one<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Project>, ApiError> {
  let project = store
    .get_project(id)
    .await
    .map_err(ApiError::store("Could not retrieve project"))?
    .ok_or_else(|| CoreError::missing(EntityKind::Project))?;
  Ok(Json(project))
}

/// `PUT /projects/:id`
pub async fn update<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
  let patch = match json_object(body).and_then(|b| Ok(validate::project_patch(&b)?)) {
    Ok(patch) => patch,
    Err(invalid) => {
      // A missing target outranks a bad body.
      store
        .get_project(id)
        .await
        .map_err(ApiError::store("Could not update project"))?
        .ok_or_else(|| CoreError::missing(EntityKind::Project))?;
      return Err(invalid);
    }
  };
  let project = store
    .update_project(id, patch)
    .await
    .map_err(ApiError::store("Could not update project"))?;
  Ok(Json(project))
}

/// `DELETE /projects/:id`
pub async fn delete<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Value>, ApiError> {
  store
    .delete_project(id)
    .await
    .map_err(ApiError::store("Could not delete project"))?;
  Ok(Json(json!({ "message": "Project deleted" })))
}

/// `GET /projects/:id/assignments`
pub async fn assignments<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Vec<Assignment>>, ApiError> {
  let assignments = store
    .list_assignments_for_project(id)
    .await
    .map_err(ApiError::store("Could not retrieve assignments"))?;
  Ok(Json(assignments))
}
