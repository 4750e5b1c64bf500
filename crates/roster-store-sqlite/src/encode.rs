//! Conversions between SQLite rows and the row types of `roster-core`.
//!
//! Keys are stored as plain `INTEGER` columns; every column list used by the
//! store is in the order these readers expect.

use roster_core::{
  department::DepartmentId,
  employee::{EmployeeId, EmployeeRecord},
  review::{ReviewId, ReviewRecord},
  store::Row,
};

/// Column order read by [`employee_row`].
pub const EMPLOYEE_COLUMNS: &str = "id, name, job_title, department_id";

/// Column order read by [`review_row`].
pub const REVIEW_COLUMNS: &str = "id, year, summary, employee_id";

pub fn employee_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<EmployeeId, EmployeeRecord>> {
  Ok(Row {
    id:     EmployeeId(row.get(0)?),
    record: EmployeeRecord {
      name:          row.get(1)?,
      job_title:     row.get(2)?,
      department_id: DepartmentId(row.get(3)?),
    },
  })
}

pub fn review_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<ReviewId, ReviewRecord>> {
  Ok(Row {
    id:     ReviewId(row.get(0)?),
    record: ReviewRecord {
      year:        row.get(1)?,
      summary:     row.get(2)?,
      employee_id: EmployeeId(row.get(3)?),
    },
  })
}
