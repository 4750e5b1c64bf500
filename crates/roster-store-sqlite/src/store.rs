//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use roster_core::{
  Lookup, Session,
  department::DepartmentId,
  employee::{EmployeeId, EmployeeRecord},
  review::{ReviewId, ReviewRecord},
  store::{RosterStore, Row},
};

use crate::{
  Result,
  encode::{EMPLOYEE_COLUMNS, REVIEW_COLUMNS, employee_row, review_row},
  schema::{
    CREATE_DEPARTMENTS, CREATE_EMPLOYEES, CREATE_REVIEWS, DROP_DEPARTMENTS,
    DROP_EMPLOYEES, DROP_REVIEWS, PRAGMAS,
  },
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Opening a
/// store does not create any tables; that is left to the `create_*` calls.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a database file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  /// A fresh [`Session`] over this store, which also serves as the session's
  /// department lookup.
  pub fn session(&self) -> Session<SqliteStore, SqliteStore> {
    Session::new(self.clone(), self.clone())
  }

  async fn configure(&self) -> Result<()> {
    self.batch(PRAGMAS).await
  }

  async fn batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single write statement and return the number of rows affected.
  async fn execute<P>(&self, sql: &'static str, params: P) -> Result<u64>
  where
    P: rusqlite::Params + Send + 'static,
  {
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, params)?))
      .await?;
    Ok(affected as u64)
  }

  /// Run a single `INSERT` and return the generated row id.
  async fn insert<P>(&self, sql: &'static str, params: P) -> Result<i64>
  where
    P: rusqlite::Params + Send + 'static,
  {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(sql, params)?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  // ── Departments ───────────────────────────────────────────────────────

  pub async fn create_departments_table(&self) -> Result<()> {
    self.batch(CREATE_DEPARTMENTS).await
  }

  pub async fn drop_departments_table(&self) -> Result<()> {
    self.batch(DROP_DEPARTMENTS).await
  }

  /// Insert a department and return its key.
  pub async fn add_department(&self, name: impl Into<String>) -> Result<DepartmentId> {
    let name = name.into();
    let id = self
      .insert("INSERT INTO departments (name) VALUES (?1)", (name,))
      .await?;
    Ok(DepartmentId(id))
  }

  pub async fn department_exists(&self, id: DepartmentId) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM departments WHERE id = ?1",
              rusqlite::params![id.0],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── Department lookup ───────────────────────────────────────────────────────

impl Lookup<DepartmentId> for SqliteStore {
  async fn exists(&self, id: DepartmentId) -> roster_core::Result<bool> {
    self
      .department_exists(id)
      .await
      .map_err(roster_core::Error::store)
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = crate::Error;

  // ── Employees ─────────────────────────────────────────────────────────

  async fn create_employees_table(&self) -> Result<()> {
    self.batch(CREATE_EMPLOYEES).await
  }

  async fn drop_employees_table(&self) -> Result<()> {
    self.batch(DROP_EMPLOYEES).await
  }

  async fn insert_employee(&self, record: EmployeeRecord) -> Result<EmployeeId> {
    let id = self
      .insert(
        "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3)",
        (record.name, record.job_title, record.department_id.0),
      )
      .await?;
    Ok(EmployeeId(id))
  }

  async fn update_employee(&self, id: EmployeeId, record: EmployeeRecord) -> Result<u64> {
    self
      .execute(
        "UPDATE employees SET name = ?1, job_title = ?2, department_id = ?3 WHERE id = ?4",
        (record.name, record.job_title, record.department_id.0, id.0),
      )
      .await
  }

  async fn get_employee(
    &self,
    id: EmployeeId,
  ) -> Result<Option<Row<EmployeeId, EmployeeRecord>>> {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"),
              rusqlite::params![id.0],
              employee_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_employees(&self) -> Result<Vec<Row<EmployeeId, EmployeeRecord>>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id"))?;
        let rows = stmt
          .query_map([], employee_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  async fn create_reviews_table(&self) -> Result<()> {
    self.batch(CREATE_REVIEWS).await
  }

  async fn drop_reviews_table(&self) -> Result<()> {
    self.batch(DROP_REVIEWS).await
  }

  async fn insert_review(&self, record: ReviewRecord) -> Result<ReviewId> {
    let id = self
      .insert(
        "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3)",
        (record.year, record.summary, record.employee_id.0),
      )
      .await?;
    Ok(ReviewId(id))
  }

  async fn update_review(&self, id: ReviewId, record: ReviewRecord) -> Result<u64> {
    self
      .execute(
        "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4",
        (record.year, record.summary, record.employee_id.0, id.0),
      )
      .await
  }

  async fn delete_review(&self, id: ReviewId) -> Result<u64> {
    self
      .execute("DELETE FROM reviews WHERE id = ?1", (id.0,))
      .await
  }

  async fn get_review(&self, id: ReviewId) -> Result<Option<Row<ReviewId, ReviewRecord>>> {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"),
              rusqlite::params![id.0],
              review_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn list_reviews(&self) -> Result<Vec<Row<ReviewId, ReviewRecord>>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id"))?;
        let rows = stmt
          .query_map([], review_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn list_reviews_for_employee(
    &self,
    employee_id: EmployeeId,
  ) -> Result<Vec<Row<ReviewId, ReviewRecord>>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVIEW_COLUMNS} FROM reviews WHERE employee_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![employee_id.0], review_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}
