//! [`Session`] — the caller-owned unit that holds the identity caches.

use crate::{
  employee::{Employee, EmployeeId},
  employees::Employees,
  identity::IdentityMap,
  review::{Review, ReviewId},
  reviews::Reviews,
};

/// A store plus the identity caches for everything loaded through it.
///
/// Within one session, loading the same row twice yields the same
/// [`Handle`](crate::Handle). Sessions do not share instances.
///
/// `departments` is the existence check employees are validated against.
///
/// Loads read the row first and only then consult the cache, so a row
/// deleted elsewhere reads as absent. The cache is keyed by primary key
/// alone: if another session deletes row N and the store later hands N to a
/// new row, this session returns its old handle for N, with the old field
/// values. Call [`clear`](Self::clear) after writes made outside the session.
pub struct Session<S, D> {
  store:       S,
  departments: D,
  employees:   IdentityMap<EmployeeId, Employee>,
  reviews:     IdentityMap<ReviewId, Review>,
}

impl<S, D> Session<S, D> {
  pub fn new(store: S, departments: D) -> Self {
    Self {
      store,
      departments,
      employees: IdentityMap::new(),
      reviews: IdentityMap::new(),
    }
  }

  pub fn employees(&self) -> Employees<'_, S, D> {
    Employees {
      store:       &self.store,
      departments: &self.departments,
      cache:       &self.employees,
      reviews:     &self.reviews,
    }
  }

  pub fn reviews(&self) -> Reviews<'_, S, Employees<'_, S, D>> {
    Reviews {
      store:     &self.store,
      employees: self.employees(),
      cache:     &self.reviews,
    }
  }

  /// Forget every materialized instance. Handles already given out stay
  /// valid but are no longer what subsequent loads return.
  pub fn clear(&self) {
    self.employees.clear();
    self.reviews.clear();
  }

  /// Number of cached `(employees, reviews)` instances.
  pub fn cached(&self) -> (usize, usize) { (self.employees.len(), self.reviews.len()) }
}
