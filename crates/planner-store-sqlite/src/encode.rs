//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings, which sort the same way the
//! dates do. Budgets are stored as their scale-2 decimal string, so no
//! float ever sits between the wire and the disk.

use chrono::NaiveDate;
use planner_core::{
  assignment::Assignment, budget::Budget, person::Person, project::Project,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── Budget ──────────────────────────────────────────────────────────────────

pub fn encode_budget(b: Budget) -> String { b.to_string() }

pub fn decode_budget(s: &str) -> Result<Budget> {
  s.parse()
    .map_err(|e| Error::Decode(format!("bad budget {s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Persons have no encoded columns and decode straight from the row.
pub fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:            row.get(0)?,
    name:          row.get(1)?,
    working_hours: row.get(2)?,
  })
}

/// Raw values read from [`crate::schema::PROJECT_SELECT`].
pub struct RawProject {
  pub id:                   i64,
  pub name:                 String,
  pub project_manager_id:   i64,
  pub project_manager_name: Option<String>,
  pub budget:               Option<String>,
}

impl RawProject {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      name:                 row.get(1)?,
      project_manager_id:   row.get(2)?,
      project_manager_name: row.get(3)?,
      budget:               row.get(4)?,
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:                   self.id,
      name:                 self.name,
      project_manager_id:   self.project_manager_id,
      project_manager_name: self.project_manager_name,
      budget:               self.budget.as_deref().map(decode_budget).transpose()?,
    })
  }
}

/// Raw values read from [`crate::schema::ASSIGNMENT_SELECT`].
pub struct RawAssignment {
  pub id:             i64,
  pub project_id:     i64,
  pub project_name:   Option<String>,
  pub person_id:      i64,
  pub person_name:    Option<String>,
  pub assigned_hours: i64,
  pub timeline_start: Option<String>,
  pub timeline_end:   Option<String>,
}

impl RawAssignment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      project_id:     row.get(1)?,
      project_name:   row.get(2)?,
      person_id:      row.get(3)?,
      person_name:    row.get(4)?,
      assigned_hours: row.get(5)?,
      timeline_start: row.get(6)?,
      timeline_end:   row.get(7)?,
    })
  }

  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      id:             self.id,
      project_id:     self.project_id,
      project_name:   self.project_name,
      person_id:      self.person_id,
      person_name:    self.person_name,
      assigned_hours: self.assigned_hours,
      timeline_start: self.timeline_start.as_deref().map(decode_date).transpose()?,
      timeline_end:   self.timeline_end.as_deref().map(decode_date).transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_roundtrip_through_iso_text() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(encode_date(d), "2024-02-29");
    assert_eq!(decode_date("2024-02-29").unwrap(), d);
    assert!(decode_date("2024/02/29").is_err());
  }

  #[test]
  fn budget_keeps_two_places() {
    let b: Budget = "10000.5".parse().unwrap();
    assert_eq!(encode_budget(b), "10000.50");
    assert_eq!(decode_budget("10000.50").unwrap(), b);
  }
}
