//! Request-body validation.
//!
//! Each function turns a decoded JSON object into the typed input a
//! [`PlannerStore`](crate::store::PlannerStore) accepts, or fails with the
//! message the API reports verbatim. Only shape and type are checked here;
//! whether referenced entities exist is the store's business.
//!
//! A key that is absent, a key set to `null`, and a key set to a value are
//! three different things on update: omitted keys keep the stored value,
//! `null` clears a nullable field.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  assignment::{
    AssignmentPatch, HOURS_NOT_POSITIVE, NewAssignment, check_hours, check_timeline,
  },
  budget::{Budget, BudgetError},
  person::{NewPerson, PersonPatch},
  project::{NewProject, ProjectPatch},
};

/// A decoded JSON request body.
pub type Body = Map<String, Value>;

pub const NO_INPUT: &str = "No input data provided";
pub const NO_UPDATE_DATA: &str = "No data provided for update";
pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_NOT_BLANK: &str = "Name must be a non-empty string";
pub const PROJECT_NAME_REQUIRED: &str = "Name is required and must be a non-empty string";
pub const WORKING_HOURS: &str = "Working hours must be an integer";
pub const WORKING_HOURS_OR_NULL: &str = "Working hours must be an integer or null";
pub const MANAGER_REQUIRED: &str = "Project manager ID is required and must be an integer";
pub const MANAGER_NOT_INT: &str = "Project manager ID must be an integer";
pub const ASSIGNMENT_FIELDS: &str = "Missing or invalid type for one or more required fields: \
   project_id (int), person_id (int), assigned_hours (int), timeline_start (str), timeline_end (str)";
pub const PROJECT_ID_NOT_INT: &str = "project_id must be an integer";
pub const PERSON_ID_NOT_INT: &str = "person_id must be an integer";
pub const BAD_DATE: &str = "Invalid date format. Use YYYY-MM-DD.";

/// Response fields a client may send back unchanged; they are ignored.
const ECHOED: &[&str] = &["id", "project_manager_name", "project_name", "person_name"];

const PERSON_FIELDS: &[&str] = &["name", "working_hours"];
const PROJECT_FIELDS: &[&str] = &["name", "project_manager_id", "budget"];
const ASSIGNMENT_KEYS: &[&str] =
  &["project_id", "person_id", "assigned_hours", "timeline_start", "timeline_end"];

// ─── Body ────────────────────────────────────────────────────────────────────

/// Accept only a JSON object as a request body.
pub fn body(value: Option<Value>) -> Result<Body> {
  match value {
    Some(Value::Object(map)) => Ok(map),
    _ => Err(Error::invalid(NO_INPUT)),
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

pub fn new_person(body: &Body) -> Result<NewPerson> {
  reject_unknown(body, PERSON_FIELDS)?;

  let name = match field(body, "name") {
    Field::Absent | Field::Null => return Err(Error::invalid(NAME_REQUIRED)),
    Field::Set(Value::String(s)) if s.is_empty() => {
      return Err(Error::invalid(NAME_REQUIRED));
    }
    Field::Set(v) => non_blank(v, NAME_NOT_BLANK)?,
  };

  let working_hours = match field(body, "working_hours") {
    Field::Absent | Field::Null => None,
    Field::Set(v) => Some(integer(v).ok_or_else(|| Error::invalid(WORKING_HOURS))?),
  };

  Ok(NewPerson { name, working_hours })
}

pub fn person_patch(body: &Body) -> Result<PersonPatch> {
  reject_unknown(body, PERSON_FIELDS)?;
  require_update_data(body)?;

  let name = match field(body, "name") {
    Field::Absent => None,
    Field::Null => return Err(Error::invalid(NAME_NOT_BLANK)),
    Field::Set(v) => Some(non_blank(v, NAME_NOT_BLANK)?),
  };

  let working_hours = match field(body, "working_hours") {
    Field::Absent => None,
    Field::Null => Some(None),
    Field::Set(v) => Some(Some(
      integer(v).ok_or_else(|| Error::invalid(WORKING_HOURS_OR_NULL))?,
    )),
  };

  Ok(PersonPatch { name, working_hours })
}

// ─── Projects ────────────────────────────────────────────────────────────────

pub fn new_project(body: &Body) -> Result<NewProject> {
  reject_unknown(body, PROJECT_FIELDS)?;

  let name = match field(body, "name") {
    Field::Set(v) => non_blank(v, PROJECT_NAME_REQUIRED)?,
    Field::Absent | Field::Null => return Err(Error::invalid(PROJECT_NAME_REQUIRED)),
  };

  let project_manager_id = match field(body, "project_manager_id") {
    Field::Set(v) => integer(v).ok_or_else(|| Error::invalid(MANAGER_REQUIRED))?,
    Field::Absent | Field::Null => return Err(Error::invalid(MANAGER_REQUIRED)),
  };

  let budget = match field(body, "budget") {
    Field::Absent | Field::Null => None,
    Field::Set(v) => Some(budget(v)?),
  };

  Ok(NewProject { name, project_manager_id, budget })
}

pub fn project_patch(body: &Body) -> Result<ProjectPatch> {
  reject_unknown(body, PROJECT_FIELDS)?;
  require_update_data(body)?;

  let name = match field(body, "name") {
    Field::Absent => None,
    Field::Null => return Err(Error::invalid(NAME_NOT_BLANK)),
    Field::Set(v) => Some(non_blank(v, NAME_NOT_BLANK)?),
  };

  let project_manager_id = match field(body, "project_manager_id") {
    Field::Absent => None,
    Field::Null => return Err(Error::invalid(MANAGER_NOT_INT)),
    Field::Set(v) => Some(integer(v).ok_or_else(|| Error::invalid(MANAGER_NOT_INT))?),
  };

  let budget = match field(body, "budget") {
    Field::Absent => None,
    Field::Null => Some(None),
    Field::Set(v) => Some(Some(budget(v)?)),
  };

  Ok(ProjectPatch { name, project_manager_id, budget })
}

// ─── Assignments ─────────────────────────────────────────────────────────────

pub fn new_assignment(body: &Body) -> Result<NewAssignment> {
  reject_unknown(body, ASSIGNMENT_KEYS)?;

  let required_int = |key| match field(body, key) {
    Field::Set(v) => integer(v).ok_or_else(|| Error::invalid(ASSIGNMENT_FIELDS)),
    _ => Err(Error::invalid(ASSIGNMENT_FIELDS)),
  };
  let required_str = |key| match field(body, key) {
    Field::Set(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
    _ => Err(Error::invalid(ASSIGNMENT_FIELDS)),
  };

  let project_id = required_int("project_id")?;
  let person_id = required_int("person_id")?;
  let assigned_hours = required_int("assigned_hours")?;
  let start = required_str("timeline_start")?;
  let end = required_str("timeline_end")?;

  check_hours(assigned_hours)?;
  let timeline_start = Some(date(start)?);
  let timeline_end = Some(date(end)?);
  check_timeline(timeline_start, timeline_end)?;

  Ok(NewAssignment { project_id, person_id, assigned_hours, timeline_start, timeline_end })
}

/// The window ordering of a patch can only be checked once it is merged with
/// the stored assignment; see [`AssignmentPatch::apply`].
pub fn assignment_patch(body: &Body) -> Result<AssignmentPatch> {
  reject_unknown(body, ASSIGNMENT_KEYS)?;
  if body.is_empty() {
    return Err(Error::invalid(NO_INPUT));
  }

  let project_id = optional_int(body, "project_id", PROJECT_ID_NOT_INT)?;
  let person_id = optional_int(body, "person_id", PERSON_ID_NOT_INT)?;
  let assigned_hours = optional_int(body, "assigned_hours", HOURS_NOT_POSITIVE)?;
  if let Some(hours) = assigned_hours {
    check_hours(hours)?;
  }

  Ok(AssignmentPatch {
    project_id,
    person_id,
    assigned_hours,
    timeline_start: optional_date(body, "timeline_start")?,
    timeline_end: optional_date(body, "timeline_end")?,
  })
}

// ─── Field helpers ───────────────────────────────────────────────────────────

enum Field<'a> {
  Absent,
  Null,
  Set(&'a Value),
}

fn field<'a>(body: &'a Body, key: &str) -> Field<'a> {
  match body.get(key) {
    None => Field::Absent,
    Some(Value::Null) => Field::Null,
    Some(v) => Field::Set(v),
  }
}

fn reject_unknown(body: &Body, known: &[&str]) -> Result<()> {
  match body
    .keys()
    .find(|k| !known.contains(&k.as_str()) && !ECHOED.contains(&k.as_str()))
  {
    Some(key) => Err(Error::invalid(format!("Unknown field: {key}"))),
    None => Ok(()),
  }
}

/// An update body may not be empty. One holding only echoed fields is a
/// valid no-op.
fn require_update_data(body: &Body) -> Result<()> {
  if body.is_empty() {
    return Err(Error::invalid(NO_UPDATE_DATA));
  }
  Ok(())
}

/// JSON integers only; `40.0` and `true` are not integers.
fn integer(v: &Value) -> Option<i64> { v.as_i64() }

fn non_blank(v: &Value, message: &str) -> Result<String> {
  match v.as_str().map(str::trim) {
    Some(s) if !s.is_empty() => Ok(s.to_owned()),
    _ => Err(Error::invalid(message)),
  }
}

/// Numbers and numeric strings are both accepted.
fn budget(v: &Value) -> Result<Budget> {
  let parsed = match v {
    Value::Number(n) => n.to_string().parse::<Budget>(),
    Value::String(s) => s.parse::<Budget>(),
    _ => Err(BudgetError::NotANumber),
  };
  parsed.map_err(|e| Error::invalid(e.to_string()))
}

fn date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::invalid(BAD_DATE))
}

fn optional_int(body: &Body, key: &str, message: &str) -> Result<Option<i64>> {
  match field(body, key) {
    Field::Absent => Ok(None),
    Field::Null => Err(Error::invalid(message)),
    Field::Set(v) => integer(v).map(Some).ok_or_else(|| Error::invalid(message)),
  }
}

fn optional_date(body: &Body, key: &str) -> Result<Option<Option<NaiveDate>>> {
  match field(body, key) {
    Field::Absent => Ok(None),
    Field::Null => Ok(Some(None)),
    // An empty string keeps the stored date.
    Field::Set(Value::String(s)) if s.is_empty() => Ok(None),
    Field::Set(Value::String(s)) => Ok(Some(Some(date(s)?))),
    Field::Set(_) => Err(Error::invalid(BAD_DATE)),
  }
}
