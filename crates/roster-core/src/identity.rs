//! The identity cache: at most one live instance per stored row.
//!
//! An [`IdentityMap`] belongs to a [`Session`](crate::Session), never to the
//! process, so separate sessions (and separate tests) do not observe each
//! other's instances.

use std::{
  collections::HashMap,
  fmt,
  hash::Hash,
  sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// ─── Handle ──────────────────────────────────────────────────────────────────

/// A shared reference to a live entity instance.
///
/// Every caller that loads the same row through the same session receives a
/// clone of the same handle, so writes through one are visible through all.
/// Guards must not be held across an `.await`.
pub struct Handle<T>(Arc<RwLock<T>>);

impl<T> Handle<T> {
  pub fn new(value: T) -> Self { Self(Arc::new(RwLock::new(value))) }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write().unwrap_or_else(PoisonError::into_inner)
  }

  /// Whether both handles point at the same instance.
  pub fn ptr_eq(a: &Self, b: &Self) -> bool { Arc::ptr_eq(&a.0, &b.0) }
}

impl<T: Clone> Handle<T> {
  /// Copy the current state out of the handle.
  pub fn snapshot(&self) -> T { self.read().clone() }
}

impl<T> Clone for Handle<T> {
  fn clone(&self) -> Self { Self(Arc::clone(&self.0)) }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Handle").field(&*self.read()).finish()
  }
}

// ─── IdentityMap ─────────────────────────────────────────────────────────────

/// Maps primary keys to the live instance materialized for that row.
pub struct IdentityMap<Id, T> {
  entries: Mutex<HashMap<Id, Handle<T>>>,
}

impl<Id, T> Default for IdentityMap<Id, T> {
  fn default() -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
    }
  }
}

impl<Id: Eq + Hash + Copy, T> IdentityMap<Id, T> {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, HashMap<Id, Handle<T>>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn get(&self, id: Id) -> Option<Handle<T>> { self.lock().get(&id).cloned() }

  /// Register `handle` as the live instance for `id`, replacing any previous
  /// registration.
  pub fn insert(&self, id: Id, handle: Handle<T>) { self.lock().insert(id, handle); }

  pub fn remove(&self, id: Id) -> Option<Handle<T>> { self.lock().remove(&id) }

  /// Return the cached instance for `id`, or materialize one with `load` and
  /// cache it. `load` is not called on a hit.
  pub fn resolve(&self, id: Id, load: impl FnOnce() -> T) -> Handle<T> {
    self
      .lock()
      .entry(id)
      .or_insert_with(|| Handle::new(load()))
      .clone()
  }

  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.lock().is_empty() }

  pub fn clear(&self) { self.lock().clear(); }
}
