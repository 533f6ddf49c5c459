//! HTTP Basic-auth extractor, user directory, and standalone verifier.
//!
//! Users and their roles come from configuration. A verified request becomes
//! a [`Subject`] whose user id is the username.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use roster_core::{
  store::ContactStore,
  subject::{Role, Subject},
};
use serde::Deserialize;

use crate::{AppState, error::Error};

/// One configured user.
#[derive(Deserialize, Clone)]
pub struct UserConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  #[serde(default)]
  pub roles:         Vec<Role>,
}

/// The set of users allowed to sign in, keyed by username.
#[derive(Clone, Default)]
pub struct UserDirectory {
  users: HashMap<String, UserConfig>,
}

impl UserDirectory {
  pub fn new(users: impl IntoIterator<Item = UserConfig>) -> Self {
    Self {
      users: users.into_iter().map(|u| (u.username.clone(), u)).collect(),
    }
  }

  pub fn get(&self, username: &str) -> Option<&UserConfig> {
    self.users.get(username)
  }

  pub fn len(&self) -> usize { self.users.len() }

  pub fn is_empty(&self) -> bool { self.users.is_empty() }
}

/// Present in a handler means the request was authenticated as this subject.
pub struct Authenticated(pub Subject);

/// Verify credentials directly from headers and resolve the subject.
pub fn verify_auth(
  headers: &HeaderMap,
  directory: &UserDirectory,
) -> Result<Subject, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let user = directory.get(username).ok_or_else(|| {
    tracing::debug!(%username, "unknown user");
    Error::Unauthorized
  })?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::debug!(%username, "password mismatch");
      Error::Unauthorized
    })?;

  Ok(Subject::new(user.username.clone(), user.roles.iter().copied()))
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.users).map(Authenticated)
  }
}
