//! Person: someone who can manage projects and be assigned to them.

use serde::{Deserialize, Serialize};

pub type PersonId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:            PersonId,
  pub name:          String,
  /// Nominal working hours per week, if known.
  pub working_hours: Option<i64>,
}

/// Input to [`crate::store::PlannerStore::create_person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  /// Already trimmed and non-empty.
  pub name:          String,
  pub working_hours: Option<i64>,
}

/// A partial update. `None` leaves the stored value untouched;
/// `working_hours: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
  pub name:          Option<String>,
  pub working_hours: Option<Option<i64>>,
}

impl PersonPatch {
  pub fn apply(self, person: &mut Person) {
    if let Some(name) = self.name {
      person.name = name;
    }
    if let Some(hours) = self.working_hours {
      person.working_hours = hours;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn john() -> Person {
    Person { id: 1, name: "John Doe".into(), working_hours: Some(40) }
  }

  #[test]
  fn empty_patch_keeps_everything() {
    let mut p = john();
    PersonPatch::default().apply(&mut p);
    assert_eq!(p, john());
  }

  #[test]
  fn explicit_null_clears_hours() {
    let mut p = john();
    PersonPatch { name: None, working_hours: Some(None) }.apply(&mut p);
    assert_eq!(p.name, "John Doe");
    assert_eq!(p.working_hours, None);
  }
}
