//! HTTP handlers for the public API.

pub mod count;
pub mod error;

pub use count::{count_from_body, count_from_header, welcome};
pub use error::ApiError;
