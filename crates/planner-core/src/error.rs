//! Error types for `planner-core`.
//!
//! Every failure the planner reports falls in one of three classes:
//! malformed input, a missing entity (directly addressed or referenced by a
//! foreign key), or an unexpected storage failure. The messages carried by
//! the first two classes are part of the external contract.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input was malformed, missing a field, or wrongly typed.
  #[error("{0}")]
  Validation(String),

  /// The addressed entity, or an entity referenced by the input, is absent.
  #[error("{0}")]
  NotFound(String),

  /// The storage backend failed for a reason unrelated to the input.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The three entity kinds held by a planner store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  Person,
  Project,
  Assignment,
}

impl EntityKind {
  pub fn label(self) -> &'static str {
    match self {
      Self::Person => "Person",
      Self::Project => "Project",
      Self::Assignment => "Assignment",
    }
  }
}

impl Error {
  pub fn invalid(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  /// A directly addressed entity does not exist, e.g. `"Person not found"`.
  pub fn missing(kind: EntityKind) -> Self {
    Self::NotFound(format!("{} not found", kind.label()))
  }

  /// A foreign key in the input points at nothing, e.g.
  /// `"Project with ID 7 not found"`.
  pub fn missing_reference(kind: EntityKind, id: i64) -> Self {
    Self::NotFound(format!("{} with ID {id} not found", kind.label()))
  }

  /// A project's manager reference points at nothing.
  pub fn missing_manager(id: i64) -> Self {
    Self::NotFound(format!("Person with ID {id} not found as project manager"))
  }

  /// The manager view was requested for a person that does not exist.
  pub fn missing_manager_view() -> Self {
    Self::NotFound("Project manager (Person) not found".to_owned())
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }
}
