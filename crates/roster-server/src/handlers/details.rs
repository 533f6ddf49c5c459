//! Read-only views of a single contact.
//!
//! `/edit` and `/delete` return the same record as `/contacts/{id}` but are
//! gated by the edit and delete rules, so a client can learn up front
//! whether the follow-up mutation will be allowed.

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use roster_core::{contact::Contact, store::ContactStore};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::Error, handlers::contact_id};

/// `GET /contacts/{id}`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Contact>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  Ok(Json(state.contacts.details(&subject, id).await?))
}

/// `GET /contacts/{id}/edit`
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Contact>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  Ok(Json(state.contacts.edit_form(&subject, id).await?))
}

/// `GET /contacts/{id}/delete`
pub async fn delete_form<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Contact>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  Ok(Json(state.contacts.delete_form(&subject, id).await?))
}
