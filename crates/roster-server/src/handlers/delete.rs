//! `DELETE /contacts/{id}` — requires the same rights as editing.

use axum::{
  extract::{Path, State, rejection::PathRejection},
  http::StatusCode,
};
use roster_core::store::ContactStore;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::Error, handlers::contact_id};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  state.contacts.delete(&subject, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
