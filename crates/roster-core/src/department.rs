//! Department identifiers.
//!
//! Departments are owned elsewhere; this crate only ever asks whether one
//! exists, through a [`Lookup<DepartmentId>`](crate::lookup::Lookup).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DepartmentId(pub i64);

impl From<DepartmentId> for i64 {
  fn from(id: DepartmentId) -> Self { id.0 }
}

impl fmt::Display for DepartmentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}
