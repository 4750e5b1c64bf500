//! Core types and trait definitions for the roster store.
//!
//! This crate is free of database dependencies. It owns the domain entities,
//! their field validation, the identity cache and the [`Session`] through
//! which all persistence happens; backends only implement the row-level
//! [`RosterStore`](store::RosterStore) trait.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// trait signatures instead.
#![allow(async_fn_in_trait)]

pub mod department;
pub mod employee;
pub mod employees;
pub mod error;
pub mod identity;
pub mod lookup;
pub mod review;
pub mod reviews;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{Error, ReferentialError, Result, ValidationError};
pub use identity::{Handle, IdentityMap};
pub use lookup::Lookup;
pub use session::Session;
