//! [`Reviews`] — persistence operations for reviews.

use tracing::{debug, warn};

use crate::{
  employee::EmployeeId,
  error::{Error, Result},
  identity::{Handle, IdentityMap},
  lookup::{Lookup, ensure_exists},
  review::{Review, ReviewId, ReviewRecord},
  store::{RosterStore, Row},
  validate,
};

/// Review operations bound to a [`Session`](crate::Session).
///
/// `E` answers whether an employee exists; inside a session it is the
/// session's [`Employees`](crate::employees::Employees).
pub struct Reviews<'a, S, E> {
  pub(crate) store:     &'a S,
  pub(crate) employees: E,
  pub(crate) cache:     &'a IdentityMap<ReviewId, Review>,
}

impl<S, E> Reviews<'_, S, E>
where
  S: RosterStore,
  E: Lookup<EmployeeId>,
{
  // ── Schema ────────────────────────────────────────────────────────────

  pub async fn create_table(&self) -> Result<()> {
    self.store.create_reviews_table().await.map_err(Error::store)
  }

  pub async fn drop_table(&self) -> Result<()> {
    self.store.drop_reviews_table().await.map_err(Error::store)
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Validate every field and build a transient review. Nothing is written
  /// to the store.
  pub async fn build(
    &self,
    year: i64,
    summary: impl Into<String>,
    employee_id: EmployeeId,
  ) -> Result<Handle<Review>> {
    let record = ReviewRecord {
      year:        validate::year(year)?,
      summary:     validate::summary(summary.into())?,
      employee_id: self.resolve_employee(employee_id).await?,
    };
    Ok(Handle::new(Review::transient(record)))
  }

  /// Build and immediately save a new review.
  pub async fn create(
    &self,
    year: i64,
    summary: impl Into<String>,
    employee_id: EmployeeId,
  ) -> Result<Handle<Review>> {
    let review = self.build(year, summary, employee_id).await?;
    self.save(&review).await?;
    Ok(review)
  }

  /// Persist the review's current state.
  ///
  /// Transient and detached reviews are inserted and registered in the
  /// identity cache; persisted ones are written back to their row, so saving
  /// twice never duplicates a row.
  pub async fn save(&self, review: &Handle<Review>) -> Result<ReviewId> {
    let (id, record) = parts(review);
    match id {
      Some(id) => {
        self.write_back(id, record).await?;
        Ok(id)
      }
      None => {
        let id = self.store.insert_review(record).await.map_err(Error::store)?;
        review.write().assign_id(id);
        self.cache.insert(id, review.clone());
        debug!(%id, "inserted review");
        Ok(id)
      }
    }
  }

  /// Write all current field values to the review's existing row. The
  /// identity cache is untouched.
  pub async fn update(&self, review: &Handle<Review>) -> Result<()> {
    let (id, record) = parts(review);
    let id = id.ok_or(Error::NotPersisted { entity: "review" })?;
    self.write_back(id, record).await
  }

  /// Remove the review's row and cache entry and detach the instance.
  ///
  /// The instance keeps its field values. Deleting an already detached or
  /// transient review does nothing.
  pub async fn delete(&self, review: &Handle<Review>) -> Result<()> {
    let id = review.read().id();
    let Some(id) = id else {
      debug!("delete on a review without an id");
      return Ok(());
    };

    let affected = self.store.delete_review(id).await.map_err(Error::store)?;
    self.cache.remove(id);
    review.write().detach();
    debug!(%id, affected, "deleted review");
    Ok(())
  }

  /// Point the review at another employee, who must exist.
  ///
  /// Only the in-memory instance changes; call [`update`](Self::update) to
  /// store it.
  pub async fn set_employee(
    &self,
    review: &Handle<Review>,
    employee_id: EmployeeId,
  ) -> Result<()> {
    let employee_id = self.resolve_employee(employee_id).await?;
    review.write().set_employee_id(employee_id);
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Load a review by key, reusing the live instance if this session has
  /// already materialized it. Returns `None` if no row matches.
  pub async fn find_by_id(&self, id: ReviewId) -> Result<Option<Handle<Review>>> {
    let row = self.store.get_review(id).await.map_err(Error::store)?;
    Ok(row.map(|row| materialize(self.cache, row)))
  }

  /// One instance per stored row, each resolved through the identity cache.
  pub async fn get_all(&self) -> Result<Vec<Handle<Review>>> {
    let rows = self.store.list_reviews().await.map_err(Error::store)?;
    Ok(
      rows
        .into_iter()
        .map(|row| materialize(self.cache, row))
        .collect(),
    )
  }

  /// Every review filed against `employee_id`; empty if there are none.
  pub async fn for_employee(&self, employee_id: EmployeeId) -> Result<Vec<Handle<Review>>> {
    load_for_employee(self.store, self.cache, employee_id).await
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn resolve_employee(&self, id: EmployeeId) -> Result<EmployeeId> {
    ensure_exists(&self.employees, "employee_id", "employee", id).await
  }

  async fn write_back(&self, id: ReviewId, record: ReviewRecord) -> Result<()> {
    let affected = self
      .store
      .update_review(id, record)
      .await
      .map_err(Error::store)?;
    if affected == 0 {
      warn!(%id, "update matched no review row");
    } else {
      debug!(%id, "updated review");
    }
    Ok(())
  }
}

pub(crate) async fn load_for_employee<S: RosterStore>(
  store: &S,
  cache: &IdentityMap<ReviewId, Review>,
  employee_id: EmployeeId,
) -> Result<Vec<Handle<Review>>> {
  let rows = store
    .list_reviews_for_employee(employee_id)
    .await
    .map_err(Error::store)?;
  Ok(rows.into_iter().map(|row| materialize(cache, row)).collect())
}

fn materialize(
  cache: &IdentityMap<ReviewId, Review>,
  row: Row<ReviewId, ReviewRecord>,
) -> Handle<Review> {
  cache.resolve(row.id, || Review::from_row(row))
}

fn parts(review: &Handle<Review>) -> (Option<ReviewId>, ReviewRecord) {
  let current = review.read();
  (current.id(), current.record().clone())
}
