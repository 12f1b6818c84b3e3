//! `GET /project_manager/:id/projects`: every project a person manages,
//! each with its assignments.

use std::sync::Arc;

use axum::{Json, extract::State};
use planner_core::{project::ProjectWithAssignments, store::PlannerStore};

use crate::{error::ApiError, extract::EntityId};

pub async fn projects<S: PlannerStore>(
  State(store): State<Arc<S>>,
  EntityId(id): EntityId,
) -> Result<Json<Vec<ProjectWithAssignments>>, ApiError> {
  let view = store
    .manager_view(id)
    .await
    .map_err(ApiError::store("Could not retrieve manager projects"))?;
  Ok(Json(view))
}
