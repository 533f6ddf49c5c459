//! HTTP front end for the Roster contact service.
//!
//! Exposes an axum [`Router`] serving the contact lifecycle as JSON, backed
//! by any [`ContactStore`]. Every `/contacts` route authenticates with HTTP
//! Basic against the configured [`UserDirectory`] and hands the resulting
//! subject to [`ContactLifecycle`], which applies the authorization policy.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::{ContactLifecycle, store::ContactStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{UserConfig, UserDirectory};
use handlers::{create, delete, details, edit, health, list, review};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub users:      Vec<UserConfig>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ContactStore> {
  pub contacts: Arc<ContactLifecycle<S>>,
  pub users:    Arc<UserDirectory>,
}

impl<S: ContactStore> AppState<S> {
  pub fn new(store: Arc<S>, users: UserDirectory) -> Self {
    Self {
      contacts: Arc::new(ContactLifecycle::new(store)),
      users:    Arc::new(users),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the contact API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/health",                 get(health::handler))
    .route("/contacts",               get(list::handler::<S>).post(create::handler::<S>))
    .route(
      "/contacts/{id}",
      get(details::handler::<S>)
        .put(edit::handler::<S>)
        .delete(delete::handler::<S>),
    )
    .route("/contacts/{id}/edit",     get(details::edit_form::<S>))
    .route("/contacts/{id}/delete",   get(details::delete_form::<S>))
    .route("/contacts/{id}/approve",  post(review::approve::<S>))
    .route("/contacts/{id}/reject",   post(review::reject::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
