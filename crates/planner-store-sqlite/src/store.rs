//! [`SqliteStore`], the SQLite implementation of [`PlannerStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, Params, Transaction, params};

use planner_core::{
  EntityKind, Error as CoreError,
  assignment::{Assignment, AssignmentId, AssignmentPatch, NewAssignment},
  person::{NewPerson, Person, PersonId, PersonPatch},
  project::{NewProject, Project, ProjectId, ProjectPatch, ProjectWithAssignments},
  store::PlannerStore,
};

use crate::{
  Result,
  encode::{RawAssignment, RawProject, encode_budget, encode_date, person_from_row},
  schema::{ASSIGNMENT_SELECT, PROJECT_SELECT, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A planner store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside one transaction on the connection thread.
  ///
  /// The transaction commits only if `f` succeeds; on any error it is
  /// dropped, which rolls back every write `f` made.
  async fn transact<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(in_transaction(conn, f)))
      .await?
  }
}

fn in_transaction<T>(
  conn: &mut Connection,
  f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
  let tx = conn.transaction()?;
  let value = f(&tx)?;
  tx.commit()?;
  Ok(value)
}

// ─── Row access ──────────────────────────────────────────────────────────────

/// `table` is always one of the schema's table names, never user input.
fn exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
  Ok(conn.query_row(&sql, [id], |_| Ok(())).optional()?.is_some())
}

fn delete_row(conn: &Connection, table: &str, id: i64, kind: EntityKind) -> Result<()> {
  let removed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
  if removed == 0 {
    return Err(CoreError::missing(kind).into());
  }
  Ok(())
}

fn fetch_person(conn: &Connection, id: PersonId) -> Result<Option<Person>> {
  Ok(
    conn
      .query_row(
        "SELECT id, name, working_hours FROM persons WHERE id = ?1",
        [id],
        person_from_row,
      )
      .optional()?,
  )
}

fn fetch_project(conn: &Connection, id: ProjectId) -> Result<Option<Project>> {
  conn
    .query_row(&format!("{PROJECT_SELECT} WHERE p.id = ?1"), [id], RawProject::from_row)
    .optional()?
    .map(RawProject::into_project)
    .transpose()
}

fn fetch_assignment(conn: &Connection, id: AssignmentId) -> Result<Option<Assignment>> {
  conn
    .query_row(
      &format!("{ASSIGNMENT_SELECT} WHERE a.id = ?1"),
      [id],
      RawAssignment::from_row,
    )
    .optional()?
    .map(RawAssignment::into_assignment)
    .transpose()
}

fn query_projects(conn: &Connection, filter: &str, params: impl Params) -> Result<Vec<Project>> {
  let mut stmt = conn.prepare(&format!("{PROJECT_SELECT} {filter} ORDER BY p.id"))?;
  let raws = stmt
    .query_map(params, RawProject::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawProject::into_project).collect()
}

fn query_assignments(
  conn: &Connection,
  filter: &str,
  params: impl Params,
) -> Result<Vec<Assignment>> {
  let mut stmt = conn.prepare(&format!("{ASSIGNMENT_SELECT} {filter} ORDER BY a.id"))?;
  let raws = stmt
    .query_map(params, RawAssignment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawAssignment::into_assignment).collect()
}

/// Re-read a row written in this transaction so joined names are current.
fn read_back_project(conn: &Connection, id: ProjectId) -> Result<Project> {
  fetch_project(conn, id)?.ok_or_else(|| CoreError::missing(EntityKind::Project).into())
}

fn read_back_assignment(conn: &Connection, id: AssignmentId) -> Result<Assignment> {
  fetch_assignment(conn, id)?
    .ok_or_else(|| CoreError::missing(EntityKind::Assignment).into())
}

// ─── PlannerStore impl ───────────────────────────────────────────────────────

impl PlannerStore for SqliteStore {
  type Error = crate::Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let person = self
      .transact(move |tx| {
        tx.execute(
          "INSERT INTO persons (name, working_hours) VALUES (?1, ?2)",
          params![input.name, input.working_hours],
        )?;
        Ok(Person {
          id:            tx.last_insert_rowid(),
          name:          input.name,
          working_hours: input.working_hours,
        })
      })
      .await?;

    tracing::debug!(id = person.id, "created person");
    Ok(person)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    self.transact(move |tx| fetch_person(tx, id)).await
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    self
      .transact(|tx| {
        let mut stmt =
          tx.prepare("SELECT id, name, working_hours FROM persons ORDER BY id")?;
        let persons = stmt
          .query_map([], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(persons)
      })
      .await
  }

  async fn update_person(&self, id: PersonId, patch: PersonPatch) -> Result<Person> {
    let person = self
      .transact(move |tx| {
        let mut person =
          fetch_person(tx, id)?.ok_or_else(|| CoreError::missing(EntityKind::Person))?;
        patch.apply(&mut person);
        tx.execute(
          "UPDATE persons SET name = ?1, working_hours = ?2 WHERE id = ?3",
          params![person.name, person.working_hours, id],
        )?;
        Ok(person)
      })
      .await?;

    tracing::debug!(id, "updated person");
    Ok(person)
  }

  async fn delete_person(&self, id: PersonId) -> Result<()> {
    self
      .transact(move |tx| delete_row(tx, "persons", id, EntityKind::Person))
      .await?;
    tracing::debug!(id, "deleted person");
    Ok(())
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn create_project(&self, input: NewProject) -> Result<Project> {
    let project = self
      .transact(move |tx| {
        let manager_id = input.project_manager_id;
        if !exists(tx, "persons", manager_id)? {
          return Err(CoreError::missing_manager(manager_id).into());
        }
        tx.execute(
          "INSERT INTO projects (name, project_manager_id, budget) VALUES (?1, ?2, ?3)",
          params![input.name, manager_id, input.budget.map(encode_budget)],
        )?;
        read_back_project(tx, tx.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id = project.id, "created project");
    Ok(project)
  }

  async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
    self.transact(move |tx| fetch_project(tx, id)).await
  }

  async fn list_projects(&self) -> Result<Vec<Project>> {
    self.transact(|tx| query_projects(tx, "", [])).await
  }

  async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project> {
    let project = self
      .transact(move |tx| {
        let mut project =
          fetch_project(tx, id)?.ok_or_else(|| CoreError::missing(EntityKind::Project))?;

        if let Some(manager_id) = patch.manager_change(&project)
          && !exists(tx, "persons", manager_id)?
        {
          return Err(CoreError::missing_manager(manager_id).into());
        }

        patch.apply(&mut project);
        tx.execute(
          "UPDATE projects SET name = ?1, project_manager_id = ?2, budget = ?3 WHERE id = ?4",
          params![
            project.name,
            project.project_manager_id,
            project.budget.map(encode_budget),
            id,
          ],
        )?;
        read_back_project(tx, id)
      })
      .await?;

    tracing::debug!(id, "updated project");
    Ok(project)
  }

  async fn delete_project(&self, id: ProjectId) -> Result<()> {
    self
      .transact(move |tx| delete_row(tx, "projects", id, EntityKind::Project))
      .await?;
    tracing::debug!(id, "deleted project");
    Ok(())
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn create_assignment(&self, input: NewAssignment) -> Result<Assignment> {
    let assignment = self
      .transact(move |tx| {
        if !exists(tx, "projects", input.project_id)? {
          return Err(
            CoreError::missing_reference(EntityKind::Project, input.project_id).into(),
          );
        }
        if !exists(tx, "persons", input.person_id)? {
          return Err(
            CoreError::missing_reference(EntityKind::Person, input.person_id).into(),
          );
        }
        tx.execute(
          "INSERT INTO assignments (
             project_id, person_id, assigned_hours, timeline_start, timeline_end
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            input.project_id,
            input.person_id,
            input.assigned_hours,
            input.timeline_start.map(encode_date),
            input.timeline_end.map(encode_date),
          ],
        )?;
        read_back_assignment(tx, tx.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id = assignment.id, "created assignment");
    Ok(assignment)
  }

  async fn get_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>> {
    self.transact(move |tx| fetch_assignment(tx, id)).await
  }

  async fn list_assignments(&self) -> Result<Vec<Assignment>> {
    self.transact(|tx| query_assignments(tx, "", [])).await
  }

  async fn update_assignment(
    &self,
    id: AssignmentId,
    patch: AssignmentPatch,
  ) -> Result<Assignment> {
    let assignment = self
      .transact(move |tx| {
        let mut assignment = fetch_assignment(tx, id)?
          .ok_or_else(|| CoreError::missing(EntityKind::Assignment))?;

        if let Some(project_id) = patch.project_change(&assignment)
          && !exists(tx, "projects", project_id)?
        {
          return Err(CoreError::missing_reference(EntityKind::Project, project_id).into());
        }
        if let Some(person_id) = patch.person_change(&assignment)
          && !exists(tx, "persons", person_id)?
        {
          return Err(CoreError::missing_reference(EntityKind::Person, person_id).into());
        }

        patch.apply(&mut assignment)?;
        tx.execute(
          "UPDATE assignments
           SET project_id = ?1, person_id = ?2, assigned_hours = ?3,
               timeline_start = ?4, timeline_end = ?5
           WHERE id = ?6",
          params![
            assignment.project_id,
            assignment.person_id,
            assignment.assigned_hours,
            assignment.timeline_start.map(encode_date),
            assignment.timeline_end.map(encode_date),
            id,
          ],
        )?;
        read_back_assignment(tx, id)
      })
      .await?;

    tracing::debug!(id, "updated assignment");
    Ok(assignment)
  }

  async fn delete_assignment(&self, id: AssignmentId) -> Result<()> {
    self
      .transact(move |tx| delete_row(tx, "assignments", id, EntityKind::Assignment))
      .await?;
    tracing::debug!(id, "deleted assignment");
    Ok(())
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  async fn list_assignments_for_project(
    &self,
    project_id: ProjectId,
  ) -> Result<Vec<Assignment>> {
    self
      .transact(move |tx| {
        if !exists(tx, "projects", project_id)? {
          return Err(CoreError::missing(EntityKind::Project).into());
        }
        query_assignments(tx, "WHERE a.project_id = ?1", [project_id])
      })
      .await
  }

  async fn list_assignments_for_person(
    &self,
    person_id: PersonId,
  ) -> Result<Vec<Assignment>> {
    self
      .transact(move |tx| {
        if !exists(tx, "persons", person_id)? {
          return Err(CoreError::missing(EntityKind::Person).into());
        }
        query_assignments(tx, "WHERE a.person_id = ?1", [person_id])
      })
      .await
  }

  async fn manager_view(&self, manager_id: PersonId) -> Result<Vec<ProjectWithAssignments>> {
    self
      .transact(move |tx| {
        if !exists(tx, "persons", manager_id)? {
          return Err(CoreError::missing_manager_view().into());
        }
        query_projects(tx, "WHERE p.project_manager_id = ?1", [manager_id])?
          .into_iter()
          .map(|project| -> Result<ProjectWithAssignments> {
            let assignments =
              query_assignments(tx, "WHERE a.project_id = ?1", [project.id])?;
            Ok(ProjectWithAssignments { project, assignments })
          })
          .collect()
      })
      .await
  }
}
