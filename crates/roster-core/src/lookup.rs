//! Existence checks across entity types.
//!
//! A component that holds a foreign key depends only on this capability for
//! the referenced type, never on the referenced component itself.

use std::future::Future;

use crate::error::{ReferentialError, Result};

/// Answers whether a row with the given id exists.
pub trait Lookup<Id>: Send + Sync {
  fn exists(&self, id: Id) -> impl Future<Output = Result<bool>> + Send + '_;
}

/// Return `id` if `lookup` finds it, otherwise a [`ReferentialError`] naming
/// the foreign-key field.
pub async fn ensure_exists<Id, L>(
  lookup: &L,
  field:  &'static str,
  entity: &'static str,
  id:     Id,
) -> Result<Id>
where
  L: Lookup<Id>,
  Id: Copy + Into<i64>,
{
  if lookup.exists(id).await? {
    Ok(id)
  } else {
    Err(ReferentialError { field, entity, id: id.into() }.into())
  }
}
