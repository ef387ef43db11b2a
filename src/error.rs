//! Errors reported synchronously while building a subject.
//!
//! Failures of a running stream never show up here; they travel as
//! [`Event::Error`](crate::event::Event::Error).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
  #[error("replay capacity must be non-negative, got {0}")]
  Negative(i64),
  #[error("invalid replay capacity `{0}`: expected a non-negative integer or `unlimited`")]
  Invalid(String),
}
