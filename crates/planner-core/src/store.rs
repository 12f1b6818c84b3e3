//! The `PlannerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `planner-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  assignment::{Assignment, AssignmentId, AssignmentPatch, NewAssignment},
  person::{NewPerson, Person, PersonId, PersonPatch},
  project::{NewProject, Project, ProjectId, ProjectPatch, ProjectWithAssignments},
};

/// Abstraction over a planner storage backend.
///
/// Inputs arrive already shape-checked (see [`crate::validate`]). The store
/// is responsible for everything that needs stored state: foreign-key
/// existence checks, merging patches, and the invariants of a merged
/// record. Each method is one unit of work: either all of its writes land
/// or none do.
///
/// Failures are reported through `Self::Error`, which converts into
/// [`crate::Error`] so callers can tell a missing entity
/// ([`crate::Error::NotFound`]) from bad input or a storage fault.
pub trait PlannerStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn update_person(
    &self,
    id: PersonId,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Also removes the projects the person manages and every assignment
  /// that referenced either.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Fails with `NotFound` if the manager does not exist.
  fn create_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  fn get_project(
    &self,
    id: ProjectId,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// The manager reference is only re-checked when the patch changes it.
  fn update_project(
    &self,
    id: ProjectId,
    patch: ProjectPatch,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Also removes the project's assignments.
  fn delete_project(
    &self,
    id: ProjectId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Fails with `NotFound` if the project or the person does not exist;
  /// the project is checked first.
  fn create_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  fn get_assignment(
    &self,
    id: AssignmentId,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  fn list_assignments(
    &self,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Fails with `Validation` if the merged window is out of order.
  fn update_assignment(
    &self,
    id: AssignmentId,
    patch: AssignmentPatch,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  fn delete_assignment(
    &self,
    id: AssignmentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Queries ───────────────────────────────────────────────────────────

  /// Fails with `NotFound` if the project does not exist.
  fn list_assignments_for_project(
    &self,
    project_id: ProjectId,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Fails with `NotFound` if the person does not exist.
  fn list_assignments_for_person(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Every project managed by `manager_id`, each with all of its
  /// assignments, read from one consistent snapshot.
  fn manager_view(
    &self,
    manager_id: PersonId,
  ) -> impl Future<Output = Result<Vec<ProjectWithAssignments>, Self::Error>>
  + Send
  + '_;
}
