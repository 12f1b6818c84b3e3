//! Assignment: the link between a person and a project, with the hours and
//! the time window the person is booked for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, person::PersonId, project::ProjectId};

pub type AssignmentId = i64;

pub const HOURS_NOT_POSITIVE: &str = "assigned_hours must be a positive integer";
pub const START_AFTER_END: &str = "timeline_start cannot be after timeline_end";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:             AssignmentId,
  pub project_id:     ProjectId,
  pub project_name:   Option<String>,
  pub person_id:      PersonId,
  pub person_name:    Option<String>,
  /// Always greater than zero.
  pub assigned_hours: i64,
  pub timeline_start: Option<NaiveDate>,
  pub timeline_end:   Option<NaiveDate>,
}

/// Input to [`crate::store::PlannerStore::create_assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
  pub project_id:     ProjectId,
  pub person_id:      PersonId,
  pub assigned_hours: i64,
  pub timeline_start: Option<NaiveDate>,
  pub timeline_end:   Option<NaiveDate>,
}

/// A partial update. The ordering of the window is checked against the
/// merged result, so a patch may move only one end of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentPatch {
  pub project_id:     Option<ProjectId>,
  pub person_id:      Option<PersonId>,
  pub assigned_hours: Option<i64>,
  pub timeline_start: Option<Option<NaiveDate>>,
  pub timeline_end:   Option<Option<NaiveDate>>,
}

pub fn check_hours(hours: i64) -> Result<()> {
  if hours <= 0 {
    return Err(Error::invalid(HOURS_NOT_POSITIVE));
  }
  Ok(())
}

/// The window is only ordered when both ends are known.
pub fn check_timeline(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
  if let (Some(start), Some(end)) = (start, end)
    && start > end
  {
    return Err(Error::invalid(START_AFTER_END));
  }
  Ok(())
}

impl AssignmentPatch {
  pub fn project_change(&self, assignment: &Assignment) -> Option<ProjectId> {
    self.project_id.filter(|id| *id != assignment.project_id)
  }

  pub fn person_change(&self, assignment: &Assignment) -> Option<PersonId> {
    self.person_id.filter(|id| *id != assignment.person_id)
  }

  /// Merge into `assignment`, leaving it untouched if the merged result
  /// breaks an invariant.
  pub fn apply(self, assignment: &mut Assignment) -> Result<()> {
    let hours = self.assigned_hours.unwrap_or(assignment.assigned_hours);
    let start = self.timeline_start.unwrap_or(assignment.timeline_start);
    let end = self.timeline_end.unwrap_or(assignment.timeline_end);
    check_hours(hours)?;
    check_timeline(start, end)?;

    if let Some(project_id) = self.project_change(assignment) {
      assignment.project_id = project_id;
      assignment.project_name = None;
    }
    if let Some(person_id) = self.person_change(assignment) {
      assignment.person_id = person_id;
      assignment.person_name = None;
    }
    assignment.assigned_hours = hours;
    assignment.timeline_start = start;
    assignment.timeline_end = end;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn booked() -> Assignment {
    Assignment {
      id:             1,
      project_id:     1,
      project_name:   Some("Alpha".into()),
      person_id:      2,
      person_name:    Some("Jane".into()),
      assigned_hours: 20,
      timeline_start: Some(date("2024-01-01")),
      timeline_end:   Some(date("2024-01-11")),
    }
  }

  #[test]
  fn hours_boundary() {
    assert!(check_hours(1).is_ok());
    assert!(check_hours(0).unwrap_err().is_validation());
    assert!(check_hours(-5).is_err());
  }

  #[test]
  fn same_day_window_is_valid() {
    assert!(check_timeline(Some(date("2024-03-01")), Some(date("2024-03-01"))).is_ok());
  }

  #[test]
  fn start_one_day_after_end_is_rejected() {
    let err = check_timeline(Some(date("2024-03-02")), Some(date("2024-03-01")))
      .unwrap_err();
    assert_eq!(err.to_string(), START_AFTER_END);
  }

  #[test]
  fn open_ended_window_is_valid() {
    assert!(check_timeline(Some(date("2024-03-02")), None).is_ok());
    assert!(check_timeline(None, Some(date("2024-03-01"))).is_ok());
  }

  #[test]
  fn hours_only_patch_keeps_dates() {
    let mut a = booked();
    AssignmentPatch { assigned_hours: Some(30), ..Default::default() }
      .apply(&mut a)
      .unwrap();
    assert_eq!(a.assigned_hours, 30);
    assert_eq!(a.timeline_start, booked().timeline_start);
    assert_eq!(a.timeline_end, booked().timeline_end);
  }

  #[test]
  fn patch_checks_merged_window() {
    let mut a = booked();
    let patch = AssignmentPatch {
      timeline_start: Some(Some(date("2024-02-01"))),
      ..Default::default()
    };
    assert!(patch.apply(&mut a).is_err());
    assert_eq!(a, booked());
  }

  #[test]
  fn null_clears_a_date() {
    let mut a = booked();
    AssignmentPatch { timeline_end: Some(None), ..Default::default() }
      .apply(&mut a)
      .unwrap();
    assert_eq!(a.timeline_end, None);
    assert_eq!(a.timeline_start, booked().timeline_start);
  }

  #[test]
  fn moving_to_another_project_drops_stale_name() {
    let mut a = booked();
    AssignmentPatch { project_id: Some(5), ..Default::default() }
      .apply(&mut a)
      .unwrap();
    assert_eq!(a.project_id, 5);
    assert_eq!(a.project_name, None);
    assert_eq!(a.person_name.as_deref(), Some("Jane"));
  }

  #[test]
  fn dates_serialize_as_iso() {
    let json = serde_json::to_value(booked()).unwrap();
    assert_eq!(json["timeline_start"], "2024-01-01");
    assert_eq!(json["timeline_end"], "2024-01-11");
  }
}
