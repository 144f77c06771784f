//! hitcount core: error types and the wire/data model of the referrer counter.
//!
//! This crate carries no transport or storage dependencies so the HTTP layer,
//! the store implementations, and tests share one definition of what a
//! counter record and a hit response look like.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{HitCountError, Result};
pub use model::{CounterRecord, HitRequest, HitResponse, Welcome};
