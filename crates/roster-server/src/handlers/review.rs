//! `POST /contacts/{id}/approve` and `POST /contacts/{id}/reject`.

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use roster_core::{contact::Contact, store::ContactStore};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::Error, handlers::contact_id};

pub async fn approve<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Contact>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  Ok(Json(state.contacts.approve(&subject, id).await?))
}

pub async fn reject<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Contact>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  Ok(Json(state.contacts.reject(&subject, id).await?))
}
