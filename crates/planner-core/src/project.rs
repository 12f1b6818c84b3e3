//! Project: a budgeted piece of work with exactly one manager.

use serde::{Deserialize, Serialize};

use crate::{assignment::Assignment, budget::Budget, person::PersonId};

pub type ProjectId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub id:                   ProjectId,
  pub name:                 String,
  pub project_manager_id:   PersonId,
  /// Read from the manager's row at query time; never stored on the project.
  pub project_manager_name: Option<String>,
  pub budget:               Option<Budget>,
}

/// Input to [`crate::store::PlannerStore::create_project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
  pub name:               String,
  pub project_manager_id: PersonId,
  pub budget:             Option<Budget>,
}

/// A partial update. `budget: Some(None)` clears the budget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
  pub name:               Option<String>,
  pub project_manager_id: Option<PersonId>,
  pub budget:             Option<Option<Budget>>,
}

impl ProjectPatch {
  /// The new manager id, if this patch moves `project` to a different
  /// manager. Only then does the reference need an existence check.
  pub fn manager_change(&self, project: &Project) -> Option<PersonId> {
    self
      .project_manager_id
      .filter(|id| *id != project.project_manager_id)
  }

  pub fn apply(self, project: &mut Project) {
    if let Some(name) = self.name {
      project.name = name;
    }
    if let Some(manager_id) = self.project_manager_id {
      if manager_id != project.project_manager_id {
        // Stale until the project is read back from the store.
        project.project_manager_name = None;
      }
      project.project_manager_id = manager_id;
    }
    if let Some(budget) = self.budget {
      project.budget = budget;
    }
  }
}

/// One entry of the manager view: a project with all of its assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWithAssignments {
  #[serde(flatten)]
  pub project:     Project,
  pub assignments: Vec<Assignment>,
}
