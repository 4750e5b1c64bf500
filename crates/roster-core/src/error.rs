//! Error types for `roster-core`.

use thiserror::Error;

/// A field was assigned a value its rule rejects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{field} cannot be empty")]
  Blank { field: &'static str },

  #[error("{field} must be greater than or equal to {min}, got {value}")]
  BelowMinimum {
    field: &'static str,
    min:   i64,
    value: i64,
  },
}

/// A foreign key was assigned an id that resolves to no stored row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {id} must correspond to an existing {entity}")]
pub struct ReferentialError {
  pub field:  &'static str,
  pub entity: &'static str,
  pub id:     i64,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("referential error: {0}")]
  Referential(#[from] ReferentialError),

  /// An operation that needs a stored row was called on a transient or
  /// detached instance.
  #[error("{entity} has not been saved")]
  NotPersisted { entity: &'static str },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure. Store errors are passed through untranslated.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }

  pub fn is_referential(&self) -> bool { matches!(self, Self::Referential(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
