//! Employee — the parent side of the review relationship.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{department::DepartmentId, error::ValidationError, store::Row, validate};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl From<EmployeeId> for i64 {
  fn from(id: EmployeeId) -> Self { id.0 }
}

impl fmt::Display for EmployeeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// The stored columns of an `employees` row, minus the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
  pub name:          String,
  pub job_title:     String,
  pub department_id: DepartmentId,
}

/// An employee, either transient (`id() == None`) or bound to a stored row.
///
/// Fields are only reachable through validated setters. The department can
/// only be reassigned through
/// [`Employees::set_department`](crate::employees::Employees::set_department),
/// which checks that the department exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
  id:     Option<EmployeeId>,
  #[serde(flatten)]
  record: EmployeeRecord,
}

impl Employee {
  pub(crate) fn transient(record: EmployeeRecord) -> Self { Self { id: None, record } }

  pub(crate) fn from_row(row: Row<EmployeeId, EmployeeRecord>) -> Self {
    Self {
      id:     Some(row.id),
      record: row.record,
    }
  }

  pub(crate) fn assign_id(&mut self, id: EmployeeId) { self.id = Some(id); }

  pub(crate) fn set_department_id(&mut self, department_id: DepartmentId) {
    self.record.department_id = department_id;
  }

  pub fn id(&self) -> Option<EmployeeId> { self.id }

  pub fn name(&self) -> &str { &self.record.name }

  pub fn job_title(&self) -> &str { &self.record.job_title }

  pub fn department_id(&self) -> DepartmentId { self.record.department_id }

  pub fn record(&self) -> &EmployeeRecord { &self.record }

  pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
    self.record.name = validate::name(name.into())?;
    Ok(())
  }

  pub fn set_job_title(
    &mut self,
    job_title: impl Into<String>,
  ) -> Result<(), ValidationError> {
    self.record.job_title = validate::job_title(job_title.into())?;
    Ok(())
  }
}

impl fmt::Display for Employee {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.id {
      Some(id) => write!(f, "employee {id}")?,
      None => f.write_str("unsaved employee")?,
    }
    write!(
      f,
      ": {} ({}, department {})",
      self.record.name, self.record.job_title, self.record.department_id
    )
  }
}
