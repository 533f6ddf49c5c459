//! The contact authorization policy.
//!
//! Every rule lives in [`evaluate`], a pure function of the acting subject,
//! the operation, and a snapshot of the target contact. Roles are first
//! expanded into [`Capabilities`] so the rules read in terms of what a
//! subject may do rather than which roles it holds.
//!
//! | Operation | Allowed when |
//! |-----------|--------------|
//! | `Create`  | always (the caller stamps ownership) |
//! | `Read`    | `review_all`, or the contact is approved, or the subject owns it |
//! | `Update`  | `manage_all`, or the subject owns it |
//! | `Delete`  | same as `Update` |
//! | `Approve` | `review_all` |
//! | `Reject`  | `review_all` |

use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::{
  contact::{Contact, ContactStatus},
  subject::{Role, Subject},
};

// ─── Operations ──────────────────────────────────────────────────────────────

/// An action a subject asks to perform on a contact.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
  Create,
  Read,
  Update,
  Delete,
  Approve,
  Reject,
}

impl Operation {
  /// Whether the rule for this operation needs a contact snapshot.
  pub fn requires_resource(self) -> bool { !matches!(self, Self::Create) }
}

// ─── Capabilities ────────────────────────────────────────────────────────────

/// What a subject may do regardless of ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
  /// See every contact and move contacts through review.
  pub review_all: bool,
  /// Edit or delete every contact.
  pub manage_all: bool,
}

impl Capabilities {
  pub fn of(subject: &Subject) -> Self {
    let privileged = subject.has_role(Role::ContactAdministrator)
      || subject.has_role(Role::ContactManager);
    Self { review_all: privileged, manage_all: privileged }
  }
}

// ─── Decisions ───────────────────────────────────────────────────────────────

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
  #[strum(to_string = "subject does not own the contact")]
  NotOwner,
  #[strum(to_string = "contact is not approved and not owned by the subject")]
  NotVisible,
  #[strum(to_string = "subject lacks the review capability")]
  MissingReviewCapability,
  #[strum(to_string = "no contact supplied for a contact-scoped operation")]
  MissingResource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny(DenyReason),
}

impl Decision {
  pub fn is_allow(self) -> bool { matches!(self, Self::Allow) }

  fn deny_unless(allowed: bool, reason: DenyReason) -> Self {
    if allowed { Self::Allow } else { Self::Deny(reason) }
  }
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

/// Decide whether `subject` may perform `operation` on `resource`.
///
/// `resource` is `None` only for [`Operation::Create`]; any other operation
/// without a snapshot is denied.
pub fn evaluate(
  subject: &Subject,
  operation: Operation,
  resource: Option<&Contact>,
) -> Decision {
  let caps = Capabilities::of(subject);

  let contact = match (operation.requires_resource(), resource) {
    (false, _) => return Decision::Allow,
    (true, Some(c)) => c,
    (true, None) => return Decision::Deny(DenyReason::MissingResource),
  };

  match operation {
    Operation::Create => Decision::Allow,
    Operation::Read => Decision::deny_unless(
      caps.review_all
        || contact.status == ContactStatus::Approved
        || contact.is_owned_by(&subject.user_id),
      DenyReason::NotVisible,
    ),
    Operation::Update | Operation::Delete => Decision::deny_unless(
      caps.manage_all || contact.is_owned_by(&subject.user_id),
      DenyReason::NotOwner,
    ),
    Operation::Approve | Operation::Reject => Decision::deny_unless(
      caps.review_all,
      DenyReason::MissingReviewCapability,
    ),
  }
}

// ─── List scope ──────────────────────────────────────────────────────────────

/// The `Read` rule restated as a query filter, so listings narrow to what
/// the subject may see instead of failing outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
  All,
  /// Contacts owned by this user id, plus every approved contact.
  OwnedOrApproved(String),
}

impl ListScope {
  pub fn admits(&self, contact: &Contact) -> bool {
    match self {
      Self::All => true,
      Self::OwnedOrApproved(user_id) => {
        contact.status == ContactStatus::Approved
          || contact.is_owned_by(user_id)
      }
    }
  }
}

pub fn list_scope(subject: &Subject) -> ListScope {
  if Capabilities::of(subject).review_all {
    ListScope::All
  } else {
    ListScope::OwnedOrApproved(subject.user_id.clone())
  }
}
