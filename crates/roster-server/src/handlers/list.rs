//! `GET /contacts`

use axum::{Json, extract::State};
use roster_core::{contact::Contact, store::ContactStore};

use crate::{AppState, auth::Authenticated, error::Error};

/// Lists every contact the caller may read. Never `403`: an ordinary user
/// simply sees a narrower list.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Authenticated(subject): Authenticated,
) -> Result<Json<Vec<Contact>>, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.contacts.list(&subject).await?))
}
