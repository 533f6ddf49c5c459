//! Subject — the authenticated actor behind an operation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A role a user can be assigned. Ownership is not a role; it is derived by
/// comparing the subject with a contact's owner.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
  ContactAdministrator,
  ContactManager,
}

/// An authenticated user id plus its role memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub user_id: String,
  pub roles:   BTreeSet<Role>,
}

impl Subject {
  pub fn new(
    user_id: impl Into<String>,
    roles: impl IntoIterator<Item = Role>,
  ) -> Self {
    Self { user_id: user_id.into(), roles: roles.into_iter().collect() }
  }

  /// A subject with no roles.
  pub fn user(user_id: impl Into<String>) -> Self { Self::new(user_id, []) }

  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }
}
