//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use planner_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// `action` names what the handler was doing, e.g. "Could not create person".
  #[error("{action}: {source}")]
  Store {
    action: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Map a store failure for use with `map_err`, labelling storage faults
  /// with `action`.
  pub fn store<E: Into<CoreError>>(action: &'static str) -> impl FnOnce(E) -> Self {
    move |e| Self::classify(action, e.into())
  }

  fn classify(action: &'static str, e: CoreError) -> Self {
    match e {
      CoreError::Validation(m) => Self::BadRequest(m),
      CoreError::NotFound(m) => Self::NotFound(m),
      CoreError::Store(source) => Self::Store { action, source },
    }
  }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self { Self::classify("Unexpected error", e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Store { action, source } => {
        tracing::error!(error = %source, "{action}");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": action, "message": source.to_string() }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_keep_their_class() {
    let e = ApiError::store("Could not create person")(CoreError::invalid("Name is required"));
    assert!(matches!(e, ApiError::BadRequest(ref m) if m == "Name is required"));

    let e: ApiError = CoreError::NotFound("Person not found".into()).into();
    assert!(matches!(e, ApiError::NotFound(_)));

    let io = std::io::Error::other("disk full");
    let e = ApiError::store("Could not create person")(CoreError::Store(Box::new(io)));
    match e {
      ApiError::Store { action, source } => {
        assert_eq!(action, "Could not create person");
        assert_eq!(source.to_string(), "disk full");
      }
      other => panic!("expected store error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn store_error_is_500_with_action_and_cause() {
    let io = std::io::Error::other("disk full");
    let resp = ApiError::Store { action: "Could not delete person", source: Box::new(io) }
      .into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Could not delete person", "message": "disk full"}));
  }
}
