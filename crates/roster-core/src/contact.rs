//! Contact records and the input shapes accepted for them.
//!
//! A contact is owned by the subject that created it; ownership never
//! changes. Its [`ContactStatus`] tracks where it sits in the review queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Longest value accepted for any free-text contact field.
pub const MAX_FIELD_LEN: usize = 256;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Review status of a contact.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
  #[default]
  Submitted,
  Approved,
  Rejected,
}

impl ContactStatus {
  /// Whether the review state machine has an edge from `self` to `to`.
  ///
  /// Staying put is always allowed. Nothing leaves `Rejected`.
  pub fn can_transition_to(self, to: ContactStatus) -> bool {
    use ContactStatus::*;
    self == to
      || matches!(
        (self, to),
        (Submitted, Approved) | (Submitted, Rejected) | (Approved, Submitted)
      )
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The editable, user-supplied part of a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
  pub name:    String,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub city:    String,
  #[serde(default)]
  pub state:   String,
  #[serde(default)]
  pub zip:     String,
  pub email:   String,
}

impl ContactFields {
  /// Check the model constraints, returning the first violation.
  pub fn validate(&self) -> Result<()> {
    let all = [
      ("name", &self.name),
      ("address", &self.address),
      ("city", &self.city),
      ("state", &self.state),
      ("zip", &self.zip),
      ("email", &self.email),
    ];
    for (field, value) in all {
      if value.chars().count() > MAX_FIELD_LEN {
        return Err(invalid(
          field,
          format!("must be at most {MAX_FIELD_LEN} characters"),
        ));
      }
    }

    if self.name.trim().is_empty() {
      return Err(invalid("name", "is required"));
    }

    let email = self.email.trim();
    if email.is_empty() {
      return Err(invalid("email", "is required"));
    }
    match email.split_once('@') {
      Some((local, domain))
        if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
      _ => return Err(invalid("email", "is not a valid address")),
    }

    Ok(())
  }
}

fn invalid(field: &'static str, message: impl Into<String>) -> Error {
  Error::Validation { field, message: message.into() }
}

/// The allow-listed body accepted on create and edit.
///
/// `contact_id`, `owner_id` and `status` are accepted so that clients echoing
/// a full record back do not fail to parse, but none of them is trusted: the
/// owner is stamped from the acting subject and the status is decided by the
/// lifecycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
  pub contact_id: Option<Uuid>,
  pub owner_id:   Option<String>,
  #[serde(flatten)]
  pub fields:     ContactFields,
  pub status:     Option<ContactStatus>,
}

impl From<ContactFields> for ContactForm {
  fn from(fields: ContactFields) -> Self {
    Self { fields, ..Default::default() }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub contact_id: Uuid,
  /// User id of the creating subject; fixed at creation.
  pub owner_id:   String,
  #[serde(flatten)]
  pub fields:     ContactFields,
  pub status:     ContactStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Contact {
  pub fn is_owned_by(&self, user_id: &str) -> bool { self.owner_id == user_id }
}

/// Input to [`crate::store::ContactStore::add_contact`].
/// The id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewContact {
  pub owner_id: String,
  pub fields:   ContactFields,
  pub status:   ContactStatus,
}

/// Input to [`crate::store::ContactStore::update_contact`].
///
/// Carries no owner: a contact's owner cannot be changed through the store.
#[derive(Debug, Clone)]
pub struct ContactUpdate {
  pub contact_id: Uuid,
  pub fields:     ContactFields,
  pub status:     ContactStatus,
}
