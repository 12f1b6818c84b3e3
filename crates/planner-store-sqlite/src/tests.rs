//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate};
use planner_core::{
  Error as CoreError,
  assignment::{AssignmentPatch, NewAssignment},
  person::{NewPerson, Person, PersonPatch},
  project::{NewProject, Project, ProjectPatch},
  store::PlannerStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn core(e: Error) -> CoreError { e.into() }

fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

async fn person(s: &SqliteStore, name: &str) -> Person {
  s.create_person(NewPerson { name: name.into(), working_hours: Some(40) })
    .await
    .unwrap()
}

async fn project(s: &SqliteStore, name: &str, manager: &Person) -> Project {
  s.create_project(NewProject {
    name:               name.into(),
    project_manager_id: manager.id,
    budget:             Some("10000.50".parse().unwrap()),
  })
  .await
  .unwrap()
}

fn booking(project: &Project, person: &Person, hours: i64) -> NewAssignment {
  NewAssignment {
    project_id:     project.id,
    person_id:      person.id,
    assigned_hours: hours,
    timeline_start: Some(date("2024-01-01")),
    timeline_end:   Some(date("2024-01-11")),
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;

  let created = person(&s, "John Doe").await;
  assert_eq!(created.id, 1);

  let fetched = s.get_person(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.working_hours, Some(40));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_persons_in_id_order() {
  let s = store().await;
  person(&s, "A").await;
  person(&s, "B").await;
  person(&s, "C").await;

  let names: Vec<_> = s
    .list_persons()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.name)
    .collect();
  assert_eq!(names, ["A", "B", "C"]);
}

#[tokio::test]
async fn update_person_partial() {
  let s = store().await;
  let p = person(&s, "John").await;

  let updated = s
    .update_person(p.id, PersonPatch { name: Some("Johnny".into()), working_hours: None })
    .await
    .unwrap();
  assert_eq!(updated.name, "Johnny");
  assert_eq!(updated.working_hours, Some(40));

  let cleared = s
    .update_person(p.id, PersonPatch { name: None, working_hours: Some(None) })
    .await
    .unwrap();
  assert_eq!(cleared.working_hours, None);
  assert_eq!(s.get_person(p.id).await.unwrap().unwrap(), cleared);
}

#[tokio::test]
async fn update_missing_person_is_not_found() {
  let s = store().await;
  let err = core(s.update_person(9, PersonPatch::default()).await.unwrap_err());
  assert_eq!(err.to_string(), "Person not found");
}

#[tokio::test]
async fn delete_person_then_get_is_none() {
  let s = store().await;
  let p = person(&s, "John").await;

  s.delete_person(p.id).await.unwrap();
  assert!(s.get_person(p.id).await.unwrap().is_none());

  let err = core(s.delete_person(p.id).await.unwrap_err());
  assert!(err.is_not_found());
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_project_reads_manager_name() {
  let s = store().await;
  let m = person(&s, "John Doe").await;

  let p = project(&s, "Test Project Alpha", &m).await;
  assert_eq!(p.project_manager_id, m.id);
  assert_eq!(p.project_manager_name.as_deref(), Some("John Doe"));
  assert_eq!(p.budget.unwrap().to_string(), "10000.50");
}

#[tokio::test]
async fn project_manager_name_follows_renames() {
  let s = store().await;
  let m = person(&s, "John Doe").await;
  let p = project(&s, "Alpha", &m).await;

  s.update_person(m.id, PersonPatch { name: Some("Jonathan Doe".into()), working_hours: None })
    .await
    .unwrap();

  let fetched = s.get_project(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.project_manager_name.as_deref(), Some("Jonathan Doe"));
}

#[tokio::test]
async fn create_project_with_missing_manager_is_not_found() {
  let s = store().await;
  let err = core(
    s.create_project(NewProject { name: "P".into(), project_manager_id: 9999, budget: None })
      .await
      .unwrap_err(),
  );
  assert!(err.is_not_found());
  assert!(err.to_string().contains("Person with ID 9999 not found"));
  assert!(s.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_project_checks_only_changed_manager() {
  let s = store().await;
  let m = person(&s, "M").await;
  let other = person(&s, "O").await;
  let p = project(&s, "Alpha", &m).await;

  let same = s
    .update_project(p.id, ProjectPatch {
      name: Some("Alpha 2".into()),
      project_manager_id: Some(m.id),
      budget: None,
    })
    .await
    .unwrap();
  assert_eq!(same.name, "Alpha 2");
  assert_eq!(same.budget, p.budget);

  let moved = s
    .update_project(p.id, ProjectPatch {
      project_manager_id: Some(other.id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(moved.project_manager_name.as_deref(), Some("O"));

  let err = core(
    s.update_project(p.id, ProjectPatch { project_manager_id: Some(9876), ..Default::default() })
      .await
      .unwrap_err(),
  );
  assert!(err.to_string().contains("Person with ID 9876 not found"));
  let unchanged = s.get_project(p.id).await.unwrap().unwrap();
  assert_eq!(unchanged.project_manager_id, other.id);
}

#[tokio::test]
async fn update_project_clears_budget() {
  let s = store().await;
  let m = person(&s, "M").await;
  let p = project(&s, "Alpha", &m).await;

  let cleared = s
    .update_project(p.id, ProjectPatch { budget: Some(None), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(cleared.budget, None);
}

#[tokio::test]
async fn delete_project_cascades_to_assignments() {
  let s = store().await;
  let m = person(&s, "M").await;
  let p = project(&s, "Alpha", &m).await;
  let a = s.create_assignment(booking(&p, &m, 10)).await.unwrap();

  s.delete_project(p.id).await.unwrap();
  assert!(s.get_project(p.id).await.unwrap().is_none());
  assert!(s.get_assignment(a.id).await.unwrap().is_none());
  assert!(s.get_person(m.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_manager_cascades_to_projects() {
  let s = store().await;
  let m = person(&s, "M").await;
  let worker = person(&s, "W").await;
  let p = project(&s, "Alpha", &m).await;
  s.create_assignment(booking(&p, &worker, 10)).await.unwrap();

  s.delete_person(m.id).await.unwrap();
  assert!(s.list_projects().await.unwrap().is_empty());
  assert!(s.list_assignments().await.unwrap().is_empty());
  assert!(s.get_person(worker.id).await.unwrap().is_some());
}

// ─── Assignments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assignment_reads_names() {
  let s = store().await;
  let m = person(&s, "Manager").await;
  let w = person(&s, "Worker").await;
  let p = project(&s, "Alpha", &m).await;

  let a = s.create_assignment(booking(&p, &w, 20)).await.unwrap();
  assert_eq!(a.project_name.as_deref(), Some("Alpha"));
  assert_eq!(a.person_name.as_deref(), Some("Worker"));
  assert_eq!(a.assigned_hours, 20);
  assert_eq!(s.get_assignment(a.id).await.unwrap().unwrap(), a);
}

#[tokio::test]
async fn create_assignment_checks_project_then_person() {
  let s = store().await;
  let m = person(&s, "M").await;
  let p = project(&s, "Alpha", &m).await;

  let mut input = booking(&p, &m, 5);
  input.project_id = 9999;
  input.person_id = 9998;
  let err = core(s.create_assignment(input.clone()).await.unwrap_err());
  assert_eq!(err.to_string(), "Project with ID 9999 not found");

  input.project_id = p.id;
  let err = core(s.create_assignment(input).await.unwrap_err());
  assert_eq!(err.to_string(), "Person with ID 9998 not found");

  assert!(s.list_assignments().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_assignment_hours_keeps_dates() {
  let s = store().await;
  let m = person(&s, "M").await;
  let p = project(&s, "Alpha", &m).await;
  let a = s.create_assignment(booking(&p, &m, 20)).await.unwrap();

  let updated = s
    .update_assignment(a.id, AssignmentPatch { assigned_hours: Some(30), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(updated.assigned_hours, 30);
  assert_eq!(updated.timeline_start, a.timeline_start);
  assert_eq!(updated.timeline_end, a.timeline_end);
}

#[tokio::test]
async fn update_assignment_rejects_inverted_window_and_rolls_back() {
  let s = store().await;
  let m = person(&s, "M").await;
  let p = project(&s, "Alpha", &m).await;
  let a = s.create_assignment(booking(&p, &m, 20)).await.unwrap();

  let late_start = a.timeline_end.unwrap() + Duration::days(1);
  let err = core(
    s.update_assignment(a.id, AssignmentPatch {
      assigned_hours: Some(99),
      timeline_start: Some(Some(late_start)),
      ..Default::default()
    })
    .await
    .unwrap_err(),
  );
  assert!(err.is_validation());
  assert_eq!(err.to_string(), "timeline_start cannot be after timeline_end");
  assert_eq!(s.get_assignment(a.id).await.unwrap().unwrap(), a);

  let same_day = s
    .update_assignment(a.id, AssignmentPatch {
      timeline_start: Some(a.timeline_end),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(same_day.timeline_start, same_day.timeline_end);
}

#[tokio::test]
async fn update_assignment_moves_to_existing_person_only() {
  let s = store().await;
  let m = person(&s, "M").await;
  let w = person(&s, "W").await;
  let p = project(&s, "Alpha", &m).await;
  let a = s.create_assignment(booking(&p, &m, 20)).await.unwrap();

  let moved = s
    .update_assignment(a.id, AssignmentPatch { person_id: Some(w.id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(moved.person_name.as_deref(), Some("W"));

  let err = core(
    s.update_assignment(a.id, AssignmentPatch { person_id: Some(777), ..Default::default() })
      .await
      .unwrap_err(),
  );
  assert_eq!(err.to_string(), "Person with ID 777 not found");
}

#[tokio::test]
async fn delete_assignment() {
  let s = store().await;
  let m = person(&s, "M").await;
  let p = project(&s, "Alpha", &m).await;
  let a = s.create_assignment(booking(&p, &m, 20)).await.unwrap();

  s.delete_assignment(a.id).await.unwrap();
  assert!(s.get_assignment(a.id).await.unwrap().is_none());
  let err = core(s.delete_assignment(a.id).await.unwrap_err());
  assert_eq!(err.to_string(), "Assignment not found");
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn assignments_by_project_and_person() {
  let s = store().await;
  let m = person(&s, "M").await;
  let w = person(&s, "W").await;
  let alpha = project(&s, "Alpha", &m).await;
  let beta = project(&s, "Beta", &m).await;
  s.create_assignment(booking(&alpha, &w, 10)).await.unwrap();
  s.create_assignment(booking(&beta, &w, 5)).await.unwrap();
  s.create_assignment(booking(&alpha, &m, 2)).await.unwrap();

  let for_alpha = s.list_assignments_for_project(alpha.id).await.unwrap();
  assert_eq!(for_alpha.len(), 2);
  assert!(for_alpha.iter().all(|a| a.project_id == alpha.id));

  let for_w = s.list_assignments_for_person(w.id).await.unwrap();
  assert_eq!(for_w.len(), 2);
  assert!(for_w.iter().all(|a| a.person_id == w.id));

  // Reads are repeatable.
  assert_eq!(s.list_assignments_for_project(alpha.id).await.unwrap(), for_alpha);
}

#[tokio::test]
async fn assignment_queries_on_missing_owner_are_not_found() {
  let s = store().await;
  let err = core(s.list_assignments_for_project(3).await.unwrap_err());
  assert_eq!(err.to_string(), "Project not found");
  let err = core(s.list_assignments_for_person(3).await.unwrap_err());
  assert_eq!(err.to_string(), "Person not found");
}

#[tokio::test]
async fn manager_view_joins_projects_and_assignments() {
  let s = store().await;
  let m = person(&s, "M").await;
  let w = person(&s, "W").await;
  let alpha = project(&s, "Alpha", &m).await;
  let empty = project(&s, "Empty", &m).await;
  let _elsewhere = project(&s, "Elsewhere", &w).await;
  s.create_assignment(booking(&alpha, &w, 20)).await.unwrap();

  let view = s.manager_view(m.id).await.unwrap();
  assert_eq!(view.len(), 2);
  assert_eq!(view[0].project.id, alpha.id);
  assert_eq!(view[0].assignments.len(), 1);
  assert_eq!(view[0].assignments[0].assigned_hours, 20);
  assert_eq!(view[1].project.id, empty.id);
  assert!(view[1].assignments.is_empty());

  assert!(s.manager_view(w.id).await.unwrap()[0].assignments.is_empty());
}

#[tokio::test]
async fn manager_view_for_non_manager_is_empty_and_missing_is_not_found() {
  let s = store().await;
  let w = person(&s, "W").await;
  assert!(s.manager_view(w.id).await.unwrap().is_empty());

  let err = core(s.manager_view(9999).await.unwrap_err());
  assert_eq!(err.to_string(), "Project manager (Person) not found");
}
