//! Error types for `roster-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{
  contact::ContactStatus,
  policy::{DenyReason, Operation},
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact not found: {0}")]
  NotFound(Uuid),

  #[error("forbidden: {operation} denied ({reason})")]
  Forbidden {
    operation: Operation,
    reason:    DenyReason,
  },

  #[error("validation failed on `{field}`: {message}")]
  Validation {
    field:   &'static str,
    message: String,
  },

  #[error("status cannot move from {from} to {to}")]
  InvalidTransition {
    from: ContactStatus,
    to:   ContactStatus,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
