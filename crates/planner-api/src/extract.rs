//! Request extractors shared by the handlers.

use axum::{
  Json,
  extract::{FromRequestParts, Path, rejection::JsonRejection},
  http::request::Parts,
};
use planner_core::validate::{self, Body};
use serde_json::Value;

use crate::error::ApiError;

/// An integer entity id taken from the single path parameter.
///
/// Anything that does not parse as an integer is reported as 404, so
/// `/persons/abc` behaves like a route that does not exist.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
      .await
      .map_err(|_| not_found())?;
    raw.parse().map(EntityId).map_err(|_| not_found())
  }
}

fn not_found() -> ApiError { ApiError::NotFound("Not found".to_owned()) }

/// Unwrap a JSON body that must be an object.
///
/// A missing body, a wrong content type, malformed JSON and a non-object
/// value all collapse into the same "No input data provided" error.
pub fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Body, ApiError> {
  Ok(validate::body(body.ok().map(|Json(value)| value))?)
}
