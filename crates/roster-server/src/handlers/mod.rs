//! JSON handlers for `/contacts`.
//!
//! | Method   | Path                     | Notes |
//! |----------|--------------------------|-------|
//! | `GET`    | `/contacts`              | Filtered to what the caller may read |
//! | `POST`   | `/contacts`              | Body: [`ContactForm`](roster_core::contact::ContactForm); 201 |
//! | `GET`    | `/contacts/{id}`         | |
//! | `PUT`    | `/contacts/{id}`         | Body: `ContactForm` |
//! | `DELETE` | `/contacts/{id}`         | 204 |
//! | `GET`    | `/contacts/{id}/edit`    | The contact, if the caller may edit it |
//! | `GET`    | `/contacts/{id}/delete`  | The contact, if the caller may delete it |
//! | `POST`   | `/contacts/{id}/approve` | |
//! | `POST`   | `/contacts/{id}/reject`  | |

pub mod create;
pub mod delete;
pub mod details;
pub mod edit;
pub mod health;
pub mod list;
pub mod review;

use axum::extract::{Path, rejection::PathRejection};
use uuid::Uuid;

use crate::error::Error;

/// Unwrap a contact id path segment, mapping a malformed id to `400`.
pub(crate) fn contact_id(
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Uuid, Error> {
  path
    .map(|Path(id)| id)
    .map_err(|e| Error::BadRequest(e.body_text()))
}
