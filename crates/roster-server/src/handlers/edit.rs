//! `PUT /contacts/{id}`

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use roster_core::{
  contact::{Contact, ContactForm},
  store::ContactStore,
};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::Error, handlers::contact_id};

/// Replaces the editable fields. A caller without review rights who edits
/// an approved contact sends it back to `submitted`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  path: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<Contact>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let id = contact_id(path)?;
  let Json(form) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
  Ok(Json(state.contacts.edit(&subject, id, form).await?))
}
