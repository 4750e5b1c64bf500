//! Review — a yearly performance review filed against an employee.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{employee::EmployeeId, error::ValidationError, store::Row, validate};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReviewId(pub i64);

impl From<ReviewId> for i64 {
  fn from(id: ReviewId) -> Self { id.0 }
}

impl fmt::Display for ReviewId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// The stored columns of a `reviews` row, minus the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
  pub year:        i64,
  pub summary:     String,
  pub employee_id: EmployeeId,
}

/// A review, either transient, persisted, or detached after a delete.
///
/// A detached review keeps its field values but has no id; saving it again
/// inserts a fresh row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
  id:     Option<ReviewId>,
  #[serde(flatten)]
  record: ReviewRecord,
}

impl Review {
  pub(crate) fn transient(record: ReviewRecord) -> Self { Self { id: None, record } }

  pub(crate) fn from_row(row: Row<ReviewId, ReviewRecord>) -> Self {
    Self {
      id:     Some(row.id),
      record: row.record,
    }
  }

  pub(crate) fn assign_id(&mut self, id: ReviewId) { self.id = Some(id); }

  pub(crate) fn detach(&mut self) { self.id = None; }

  pub(crate) fn set_employee_id(&mut self, employee_id: EmployeeId) {
    self.record.employee_id = employee_id;
  }

  pub fn id(&self) -> Option<ReviewId> { self.id }

  pub fn year(&self) -> i64 { self.record.year }

  pub fn summary(&self) -> &str { &self.record.summary }

  pub fn employee_id(&self) -> EmployeeId { self.record.employee_id }

  pub fn record(&self) -> &ReviewRecord { &self.record }

  pub fn set_year(&mut self, year: i64) -> Result<(), ValidationError> {
    self.record.year = validate::year(year)?;
    Ok(())
  }

  pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
    self.record.summary = validate::summary(summary.into())?;
    Ok(())
  }
}

impl fmt::Display for Review {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.id {
      Some(id) => write!(f, "review {id}")?,
      None => f.write_str("unsaved review")?,
    }
    write!(
      f,
      ": {} for employee {}: {}",
      self.record.year, self.record.employee_id, self.record.summary
    )
  }
}
