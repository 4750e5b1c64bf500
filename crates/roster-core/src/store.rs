//! The `RosterStore` trait.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). It speaks in
//! plain rows: validation, identity caching and referential checks all live
//! above it in [`Session`](crate::Session).

use std::future::Future;

use crate::{
  employee::{EmployeeId, EmployeeRecord},
  review::{ReviewId, ReviewRecord},
};

/// A stored row: its primary key plus the remaining columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<Id, R> {
  pub id:     Id,
  pub record: R,
}

/// Row-level access to the `employees` and `reviews` tables.
///
/// Each write is a single statement that is committed before the future
/// resolves. Methods that return a `u64` report the number of rows affected.
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Create the `employees` table if it does not exist.
  fn create_employees_table(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Drop the `employees` table if it exists.
  fn drop_employees_table(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert a row and return the key the store assigned to it.
  fn insert_employee(
    &self,
    record: EmployeeRecord,
  ) -> impl Future<Output = Result<EmployeeId, Self::Error>> + Send + '_;

  fn update_employee(
    &self,
    id: EmployeeId,
    record: EmployeeRecord,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn get_employee(
    &self,
    id: EmployeeId,
  ) -> impl Future<Output = Result<Option<Row<EmployeeId, EmployeeRecord>>, Self::Error>>
  + Send
  + '_;

  fn list_employees(
    &self,
  ) -> impl Future<Output = Result<Vec<Row<EmployeeId, EmployeeRecord>>, Self::Error>>
  + Send
  + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Create the `reviews` table if it does not exist.
  fn create_reviews_table(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Drop the `reviews` table if it exists.
  fn drop_reviews_table(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_review(
    &self,
    record: ReviewRecord,
  ) -> impl Future<Output = Result<ReviewId, Self::Error>> + Send + '_;

  fn update_review(
    &self,
    id: ReviewId,
    record: ReviewRecord,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete a row. Deleting a missing row affects zero rows and is not an
  /// error.
  fn delete_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn get_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<Option<Row<ReviewId, ReviewRecord>>, Self::Error>>
  + Send
  + '_;

  fn list_reviews(
    &self,
  ) -> impl Future<Output = Result<Vec<Row<ReviewId, ReviewRecord>>, Self::Error>>
  + Send
  + '_;

  /// All reviews whose `employee_id` equals `employee_id`.
  fn list_reviews_for_employee(
    &self,
    employee_id: EmployeeId,
  ) -> impl Future<Output = Result<Vec<Row<ReviewId, ReviewRecord>>, Self::Error>>
  + Send
  + '_;
}
