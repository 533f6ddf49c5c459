//! `POST /contacts`

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{contact::ContactForm, store::ContactStore};

use crate::{AppState, auth::Authenticated, error::Error};

/// Returns 201 + the stored contact, owned by the caller and `submitted`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
  body: Result<Json<ContactForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let Json(form) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
  let contact = state.contacts.create(&subject, form).await?;
  Ok((StatusCode::CREATED, Json(contact)))
}
