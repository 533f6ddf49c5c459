//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  Forbidden(String),
  #[error("{0}")]
  Validation(String),
  #[error("{0}")]
  Conflict(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<roster_core::Error> for Error {
  fn from(e: roster_core::Error) -> Self {
    use roster_core::Error as Core;
    match e {
      Core::NotFound(_) => Error::NotFound(e.to_string()),
      Core::Forbidden { .. } => Error::Forbidden(e.to_string()),
      Core::Validation { .. } => Error::Validation(e.to_string()),
      Core::InvalidTransition { .. } => Error::Conflict(e.to_string()),
      Core::Store(inner) => Error::Store(inner),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    let mut res =
      (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"roster\""),
      );
    }
    res
  }
}
