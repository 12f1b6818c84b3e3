//! JSON REST API for the resource planner.
//!
//! Exposes an axum [`Router`] backed by any [`planner_core::store::PlannerStore`].
//! CORS, tracing and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", planner_api::api_router(store.clone()))
//! ```

pub mod assignments;
pub mod error;
pub mod extract;
pub mod manager;
pub mod persons;
pub mod projects;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use planner_core::store::PlannerStore;
use serde_json::{Value, json};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PlannerStore + 'static,
{
  Router::new()
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>),
    )
    .route("/persons/{id}/assignments", get(persons::assignments::<S>))
    // Projects
    .route("/projects", get(projects::list::<S>).post(projects::create::<S>))
    .route(
      "/projects/{id}",
      get(projects::get_one::<S>)
        .put(projects::update::<S>)
        .delete(projects::delete::<S>),
    )
    .route("/projects/{id}/assignments", get(projects::assignments::<S>))
    // Assignments
    .route(
      "/assignments",
      get(assignments::list::<S>).post(assignments::create::<S>),
    )
    .route(
      "/assignments/{id}",
      get(assignments::get_one::<S>)
        .put(assignments::update::<S>)
        .delete(assignments::delete::<S>),
    )
    // Manager view
    .route("/project_manager/{id}/projects", get(manager::projects::<S>))
    .route("/health", get(health))
    .with_state(store)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "OK" })) }
