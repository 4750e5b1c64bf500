//! [`Employees`] — persistence operations for employees.

use tracing::{debug, warn};

use crate::{
  department::DepartmentId,
  employee::{Employee, EmployeeId, EmployeeRecord},
  error::{Error, Result},
  identity::{Handle, IdentityMap},
  lookup::{Lookup, ensure_exists},
  review::{Review, ReviewId},
  reviews,
  store::{RosterStore, Row},
  validate,
};

/// Employee operations bound to a [`Session`](crate::Session).
///
/// Department existence is checked through the session's injected
/// [`Lookup<DepartmentId>`]. Employees itself implements
/// [`Lookup<EmployeeId>`], which is what reviews are checked against.
pub struct Employees<'a, S, D> {
  pub(crate) store:       &'a S,
  pub(crate) departments: &'a D,
  pub(crate) cache:       &'a IdentityMap<EmployeeId, Employee>,
  pub(crate) reviews:     &'a IdentityMap<ReviewId, Review>,
}

impl<S, D> Clone for Employees<'_, S, D> {
  fn clone(&self) -> Self { *self }
}

impl<S, D> Copy for Employees<'_, S, D> {}

impl<S, D> Employees<'_, S, D>
where
  S: RosterStore,
  D: Lookup<DepartmentId>,
{
  // ── Schema ────────────────────────────────────────────────────────────

  pub async fn create_table(&self) -> Result<()> {
    self.store.create_employees_table().await.map_err(Error::store)
  }

  pub async fn drop_table(&self) -> Result<()> {
    self.store.drop_employees_table().await.map_err(Error::store)
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Validate every field and build a transient employee. Nothing is
  /// written to the store.
  pub async fn build(
    &self,
    name: impl Into<String>,
    job_title: impl Into<String>,
    department_id: DepartmentId,
  ) -> Result<Handle<Employee>> {
    let record = EmployeeRecord {
      name:          validate::name(name.into())?,
      job_title:     validate::job_title(job_title.into())?,
      department_id: self.resolve_department(department_id).await?,
    };
    Ok(Handle::new(Employee::transient(record)))
  }

  /// Build and immediately save a new employee.
  pub async fn create(
    &self,
    name: impl Into<String>,
    job_title: impl Into<String>,
    department_id: DepartmentId,
  ) -> Result<Handle<Employee>> {
    let employee = self.build(name, job_title, department_id).await?;
    self.save(&employee).await?;
    Ok(employee)
  }

  /// Persist the employee's current state.
  ///
  /// A transient employee is inserted, adopts the generated key and is
  /// registered in the identity cache. A persisted one is written back to its
  /// existing row.
  pub async fn save(&self, employee: &Handle<Employee>) -> Result<EmployeeId> {
    let (id, record) = parts(employee);
    match id {
      Some(id) => {
        self.write_back(id, record).await?;
        Ok(id)
      }
      None => {
        let id = self
          .store
          .insert_employee(record)
          .await
          .map_err(Error::store)?;
        employee.write().assign_id(id);
        self.cache.insert(id, employee.clone());
        debug!(%id, "inserted employee");
        Ok(id)
      }
    }
  }

  /// Write all current field values to the employee's existing row.
  pub async fn update(&self, employee: &Handle<Employee>) -> Result<()> {
    let (id, record) = parts(employee);
    let id = id.ok_or(Error::NotPersisted { entity: "employee" })?;
    self.write_back(id, record).await
  }

  /// Point the employee at another department, which must exist.
  ///
  /// Only the in-memory instance changes; call [`save`](Self::save) or
  /// [`update`](Self::update) to store it.
  pub async fn set_department(
    &self,
    employee: &Handle<Employee>,
    department_id: DepartmentId,
  ) -> Result<()> {
    let department_id = self.resolve_department(department_id).await?;
    employee.write().set_department_id(department_id);
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Load an employee by key, reusing the live instance if this session has
  /// already materialized it. Returns `None` if no row matches.
  pub async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Handle<Employee>>> {
    let row = self.store.get_employee(id).await.map_err(Error::store)?;
    Ok(row.map(|row| self.materialize(row)))
  }

  /// One instance per stored row, each resolved through the identity cache.
  pub async fn get_all(&self) -> Result<Vec<Handle<Employee>>> {
    let rows = self.store.list_employees().await.map_err(Error::store)?;
    Ok(rows.into_iter().map(|row| self.materialize(row)).collect())
  }

  /// Every review filed against `employee`. Empty for a transient employee.
  pub async fn reviews(&self, employee: &Handle<Employee>) -> Result<Vec<Handle<Review>>> {
    let id = employee.read().id();
    let Some(id) = id else {
      return Ok(Vec::new());
    };
    reviews::load_for_employee(self.store, self.reviews, id).await
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn resolve_department(&self, id: DepartmentId) -> Result<DepartmentId> {
    ensure_exists(self.departments, "department_id", "department", id).await
  }

  async fn write_back(&self, id: EmployeeId, record: EmployeeRecord) -> Result<()> {
    let affected = self
      .store
      .update_employee(id, record)
      .await
      .map_err(Error::store)?;
    if affected == 0 {
      warn!(%id, "update matched no employee row");
    } else {
      debug!(%id, "updated employee");
    }
    Ok(())
  }

  fn materialize(&self, row: Row<EmployeeId, EmployeeRecord>) -> Handle<Employee> {
    self.cache.resolve(row.id, || Employee::from_row(row))
  }
}

impl<S, D> Lookup<EmployeeId> for Employees<'_, S, D>
where
  S: RosterStore,
  D: Lookup<DepartmentId>,
{
  async fn exists(&self, id: EmployeeId) -> Result<bool> {
    Ok(self.find_by_id(id).await?.is_some())
  }
}

fn parts(employee: &Handle<Employee>) -> (Option<EmployeeId>, EmployeeRecord) {
  let current = employee.read();
  (current.id(), current.record().clone())
}
