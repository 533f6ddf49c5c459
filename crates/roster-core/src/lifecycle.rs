//! The contact lifecycle: every read and mutation, gated by the policy.
//!
//! [`ContactLifecycle`] is the only path by which subjects touch contacts.
//! For every operation that names a contact, existence is resolved first
//! (`NotFound`), then the policy (`Forbidden`), then input validation.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  contact::{Contact, ContactForm, ContactStatus, ContactUpdate, NewContact},
  policy::{self, Decision, Operation},
  store::ContactStore,
  subject::Subject,
};

/// Decide the status an edit persists.
///
/// Reviewers get the status they asked for (or keep the current one),
/// provided the state machine allows it. Everyone else has their requested
/// status ignored, and an approved contact falls back to `Submitted` so the
/// change is reviewed again.
pub fn resolve_edit_status(
  subject: &Subject,
  current: &Contact,
  requested: Option<ContactStatus>,
) -> Result<ContactStatus> {
  let can_approve =
    policy::evaluate(subject, Operation::Approve, Some(current)).is_allow();

  if can_approve {
    let to = requested.unwrap_or(current.status);
    if !current.status.can_transition_to(to) {
      return Err(Error::InvalidTransition { from: current.status, to });
    }
    return Ok(to);
  }

  Ok(match current.status {
    ContactStatus::Approved => ContactStatus::Submitted,
    other => other,
  })
}

/// Contact operations on behalf of a subject, backed by a [`ContactStore`].
pub struct ContactLifecycle<S> {
  store: Arc<S>,
}

impl<S> Clone for ContactLifecycle<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: ContactStore> ContactLifecycle<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  fn authorize(
    &self,
    subject: &Subject,
    operation: Operation,
    contact: Option<&Contact>,
  ) -> Result<()> {
    match policy::evaluate(subject, operation, contact) {
      Decision::Allow => Ok(()),
      Decision::Deny(reason) => {
        warn!(
          user = %subject.user_id,
          %operation,
          contact_id = ?contact.map(|c| c.contact_id),
          %reason,
          "authorization denied"
        );
        Err(Error::Forbidden { operation, reason })
      }
    }
  }

  async fn load(&self, id: Uuid) -> Result<Contact> {
    self
      .store
      .get_contact(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))
  }

  async fn save(&self, update: ContactUpdate) -> Result<Contact> {
    let id = update.contact_id;
    self
      .store
      .update_contact(update)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))
  }

  // ── Create ────────────────────────────────────────────────────────────────

  /// Create a contact owned by `subject`. Any client-supplied owner or
  /// status is discarded; new contacts always start `Submitted`.
  pub async fn create(
    &self,
    subject: &Subject,
    form: ContactForm,
  ) -> Result<Contact> {
    self.authorize(subject, Operation::Create, None)?;
    form.fields.validate()?;

    let contact = self
      .store
      .add_contact(NewContact {
        owner_id: subject.user_id.clone(),
        fields:   form.fields,
        status:   ContactStatus::Submitted,
      })
      .await
      .map_err(Error::store)?;

    info!(
      contact_id = %contact.contact_id,
      owner = %contact.owner_id,
      "contact created"
    );
    Ok(contact)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Every contact `subject` may read.
  pub async fn list(&self, subject: &Subject) -> Result<Vec<Contact>> {
    let scope = policy::list_scope(subject);
    debug!(user = %subject.user_id, ?scope, "listing contacts");
    self.store.list_contacts(&scope).await.map_err(Error::store)
  }

  pub async fn details(&self, subject: &Subject, id: Uuid) -> Result<Contact> {
    let contact = self.load(id).await?;
    self.authorize(subject, Operation::Read, Some(&contact))?;
    Ok(contact)
  }

  /// The contact as it would be presented for editing.
  pub async fn edit_form(&self, subject: &Subject, id: Uuid) -> Result<Contact> {
    let contact = self.load(id).await?;
    self.authorize(subject, Operation::Update, Some(&contact))?;
    Ok(contact)
  }

  /// The contact as it would be presented for delete confirmation.
  pub async fn delete_form(
    &self,
    subject: &Subject,
    id: Uuid,
  ) -> Result<Contact> {
    let contact = self.load(id).await?;
    self.authorize(subject, Operation::Delete, Some(&contact))?;
    Ok(contact)
  }

  // ── Edit ──────────────────────────────────────────────────────────────────

  /// Replace the editable fields of contact `id`.
  ///
  /// A body naming a different contact id is treated as `NotFound`. The
  /// owner is never changed.
  pub async fn edit(
    &self,
    subject: &Subject,
    id: Uuid,
    form: ContactForm,
  ) -> Result<Contact> {
    if form.contact_id.is_some_and(|body_id| body_id != id) {
      return Err(Error::NotFound(id));
    }

    let current = self.load(id).await?;
    self.authorize(subject, Operation::Update, Some(&current))?;
    form.fields.validate()?;

    let status = resolve_edit_status(subject, &current, form.status)?;
    let demoted = current.status == ContactStatus::Approved
      && status == ContactStatus::Submitted
      && !policy::evaluate(subject, Operation::Approve, Some(&current))
        .is_allow();
    if demoted {
      info!(
        contact_id = %id,
        user = %subject.user_id,
        "approved contact edited without review capability; resubmitted"
      );
    }

    self
      .save(ContactUpdate { contact_id: id, fields: form.fields, status })
      .await
  }

  // ── Review ────────────────────────────────────────────────────────────────

  pub async fn approve(&self, subject: &Subject, id: Uuid) -> Result<Contact> {
    self
      .transition(subject, id, Operation::Approve, ContactStatus::Approved)
      .await
  }

  pub async fn reject(&self, subject: &Subject, id: Uuid) -> Result<Contact> {
    self
      .transition(subject, id, Operation::Reject, ContactStatus::Rejected)
      .await
  }

  async fn transition(
    &self,
    subject: &Subject,
    id: Uuid,
    operation: Operation,
    to: ContactStatus,
  ) -> Result<Contact> {
    let current = self.load(id).await?;
    self.authorize(subject, operation, Some(&current))?;

    if !current.status.can_transition_to(to) {
      return Err(Error::InvalidTransition { from: current.status, to });
    }

    let contact = self
      .save(ContactUpdate { contact_id: id, fields: current.fields, status: to })
      .await?;
    info!(contact_id = %id, user = %subject.user_id, status = %to, "contact reviewed");
    Ok(contact)
  }

  // ── Delete ────────────────────────────────────────────────────────────────

  pub async fn delete(&self, subject: &Subject, id: Uuid) -> Result<()> {
    let contact = self.load(id).await?;
    self.authorize(subject, Operation::Delete, Some(&contact))?;

    if !self.store.remove_contact(id).await.map_err(Error::store)? {
      return Err(Error::NotFound(id));
    }
    info!(contact_id = %id, user = %subject.user_id, "contact deleted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::BTreeMap, convert::Infallible, sync::Mutex};

  use chrono::Utc;

  use super::*;
  use crate::{
    contact::ContactFields,
    policy::{DenyReason, ListScope},
    subject::Role,
  };

  // A minimal in-memory store for exercising the lifecycle in isolation.
  #[derive(Default)]
  struct MemStore {
    contacts: Mutex<BTreeMap<Uuid, Contact>>,
  }

  impl ContactStore for MemStore {
    type Error = Infallible;

    async fn add_contact(&self, input: NewContact) -> Result<Contact, Infallible> {
      let now = Utc::now();
      let contact = Contact {
        contact_id: Uuid::new_v4(),
        owner_id:   input.owner_id,
        fields:     input.fields,
        status:     input.status,
        created_at: now,
        updated_at: now,
      };
      self.contacts.lock().unwrap().insert(contact.contact_id, contact.clone());
      Ok(contact)
    }

    async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, Infallible> {
      Ok(self.contacts.lock().unwrap().get(&id).cloned())
    }

    async fn list_contacts(&self, scope: &ListScope) -> Result<Vec<Contact>, Infallible> {
      Ok(
        self
          .contacts
          .lock()
          .unwrap()
          .values()
          .filter(|c| scope.admits(c))
          .cloned()
          .collect(),
      )
    }

    async fn update_contact(
      &self,
      update: ContactUpdate,
    ) -> Result<Option<Contact>, Infallible> {
      let mut contacts = self.contacts.lock().unwrap();
      Ok(contacts.get_mut(&update.contact_id).map(|c| {
        c.fields = update.fields;
        c.status = update.status;
        c.updated_at = Utc::now();
        c.clone()
      }))
    }

    async fn remove_contact(&self, id: Uuid) -> Result<bool, Infallible> {
      Ok(self.contacts.lock().unwrap().remove(&id).is_some())
    }
  }

  fn lifecycle() -> ContactLifecycle<MemStore> {
    ContactLifecycle::new(Arc::new(MemStore::default()))
  }

  fn form(name: &str) -> ContactForm {
    ContactFields {
      name:  name.into(),
      email: "someone@example.com".into(),
      ..Default::default()
    }
    .into()
  }

  fn user() -> Subject { Subject::user("ursula") }
  fn other() -> Subject { Subject::user("oscar") }
  fn manager() -> Subject { Subject::new("mike", [Role::ContactManager]) }
  fn admin() -> Subject { Subject::new("ada", [Role::ContactAdministrator]) }

  #[tokio::test]
  async fn create_stamps_owner_and_status() {
    let lc = lifecycle();
    let mut f = form("Carol");
    f.owner_id = Some("mallory".into());
    f.status = Some(ContactStatus::Approved);

    let c = lc.create(&user(), f).await.unwrap();
    assert_eq!(c.owner_id, "ursula");
    assert_eq!(c.status, ContactStatus::Submitted);
  }

  #[tokio::test]
  async fn create_validates_input() {
    let lc = lifecycle();
    let err = lc.create(&user(), form("")).await.unwrap_err();
    assert!(matches!(err, Error::Validation { field: "name", .. }));
    assert!(lc.list(&admin()).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn list_filters_rather_than_denies() {
    let lc = lifecycle();
    let mine = lc.create(&user(), form("Mine")).await.unwrap();
    let theirs = lc.create(&other(), form("Theirs")).await.unwrap();
    let approved = lc.create(&other(), form("Approved")).await.unwrap();
    lc.approve(&manager(), approved.contact_id).await.unwrap();

    let seen: Vec<Uuid> = lc
      .list(&user())
      .await
      .unwrap()
      .into_iter()
      .map(|c| c.contact_id)
      .collect();
    assert!(seen.contains(&mine.contact_id));
    assert!(seen.contains(&approved.contact_id));
    assert!(!seen.contains(&theirs.contact_id));

    for s in [manager(), admin()] {
      assert_eq!(lc.list(&s).await.unwrap().len(), 3);
    }
  }

  #[tokio::test]
  async fn not_found_precedes_forbidden() {
    let lc = lifecycle();
    let missing = Uuid::new_v4();
    assert!(matches!(
      lc.details(&other(), missing).await,
      Err(Error::NotFound(id)) if id == missing
    ));
    assert!(matches!(
      lc.edit(&other(), missing, form("x")).await,
      Err(Error::NotFound(_))
    ));
    assert!(matches!(
      lc.delete(&other(), missing).await,
      Err(Error::NotFound(_))
    ));
    assert!(matches!(
      lc.approve(&user(), missing).await,
      Err(Error::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn strangers_are_forbidden() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Private")).await.unwrap();
    let id = c.contact_id;

    assert!(matches!(
      lc.details(&other(), id).await,
      Err(Error::Forbidden { operation: Operation::Read, reason: DenyReason::NotVisible })
    ));
    assert!(matches!(
      lc.edit_form(&other(), id).await,
      Err(Error::Forbidden { operation: Operation::Update, .. })
    ));
    assert!(matches!(
      lc.edit(&other(), id, form("Hijacked")).await,
      Err(Error::Forbidden { operation: Operation::Update, .. })
    ));
    assert!(matches!(
      lc.delete_form(&other(), id).await,
      Err(Error::Forbidden { operation: Operation::Delete, .. })
    ));
    assert!(matches!(
      lc.delete(&other(), id).await,
      Err(Error::Forbidden { operation: Operation::Delete, .. })
    ));
    assert_eq!(lc.details(&user(), id).await.unwrap().fields.name, "Private");
  }

  #[tokio::test]
  async fn edit_checks_authorization_before_validation() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Valid")).await.unwrap();
    assert!(matches!(
      lc.edit(&other(), c.contact_id, form("")).await,
      Err(Error::Forbidden { .. })
    ));
    assert!(matches!(
      lc.edit(&user(), c.contact_id, form("")).await,
      Err(Error::Validation { field: "name", .. })
    ));
  }

  #[tokio::test]
  async fn edit_with_mismatched_body_id_is_not_found() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Body")).await.unwrap();
    let mut f = form("Body");
    f.contact_id = Some(Uuid::new_v4());
    assert!(matches!(
      lc.edit(&user(), c.contact_id, f).await,
      Err(Error::NotFound(_))
    ));

    let mut f = form("Body 2");
    f.contact_id = Some(c.contact_id);
    assert!(lc.edit(&user(), c.contact_id, f).await.is_ok());
  }

  #[tokio::test]
  async fn edit_preserves_owner() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Owned")).await.unwrap();
    let mut f = form("Owned, renamed");
    f.owner_id = Some("mike".into());
    let edited = lc.edit(&manager(), c.contact_id, f).await.unwrap();
    assert_eq!(edited.owner_id, "ursula");
  }

  #[tokio::test]
  async fn owner_cannot_approve_or_reject() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Self")).await.unwrap();
    for result in [
      lc.approve(&user(), c.contact_id).await,
      lc.reject(&user(), c.contact_id).await,
    ] {
      assert!(matches!(
        result,
        Err(Error::Forbidden { reason: DenyReason::MissingReviewCapability, .. })
      ));
    }

    let mut f = form("Self");
    f.status = Some(ContactStatus::Approved);
    let edited = lc.edit(&user(), c.contact_id, f).await.unwrap();
    assert_eq!(edited.status, ContactStatus::Submitted);
  }

  #[tokio::test]
  async fn demotion_scenario() {
    let lc = lifecycle();
    let u = user();
    let m = manager();

    let c = lc.create(&u, form("Dana")).await.unwrap();
    assert_eq!(c.owner_id, u.user_id);
    assert_eq!(c.status, ContactStatus::Submitted);

    let c = lc.approve(&m, c.contact_id).await.unwrap();
    assert_eq!(c.status, ContactStatus::Approved);

    let c = lc.edit(&u, c.contact_id, form("Dana Scully")).await.unwrap();
    assert_eq!(c.status, ContactStatus::Submitted);
    assert_eq!(c.fields.name, "Dana Scully");

    let mut f = form("Dana K. Scully");
    f.status = Some(ContactStatus::Approved);
    let c = lc.edit(&m, c.contact_id, f).await.unwrap();
    assert_eq!(c.status, ContactStatus::Approved);

    let c = lc.edit(&m, c.contact_id, form("Dana Katherine Scully")).await.unwrap();
    assert_eq!(c.status, ContactStatus::Approved);
  }

  #[tokio::test]
  async fn administrator_edit_keeps_approval() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Eve")).await.unwrap();
    lc.approve(&admin(), c.contact_id).await.unwrap();
    let c = lc.edit(&admin(), c.contact_id, form("Eve 2")).await.unwrap();
    assert_eq!(c.status, ContactStatus::Approved);
  }

  #[tokio::test]
  async fn rejected_is_terminal() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Frank")).await.unwrap();
    let c = lc.reject(&manager(), c.contact_id).await.unwrap();
    assert_eq!(c.status, ContactStatus::Rejected);

    assert!(matches!(
      lc.approve(&manager(), c.contact_id).await,
      Err(Error::InvalidTransition {
        from: ContactStatus::Rejected,
        to:   ContactStatus::Approved,
      })
    ));

    let mut f = form("Frank");
    f.status = Some(ContactStatus::Submitted);
    assert!(matches!(
      lc.edit(&admin(), c.contact_id, f).await,
      Err(Error::InvalidTransition { .. })
    ));

    let c = lc.edit(&user(), c.contact_id, form("Frank 2")).await.unwrap();
    assert_eq!(c.status, ContactStatus::Rejected);
  }

  #[tokio::test]
  async fn approved_cannot_be_rejected() {
    let lc = lifecycle();
    let c = lc.create(&user(), form("Gil")).await.unwrap();
    lc.approve(&manager(), c.contact_id).await.unwrap();
    assert!(matches!(
      lc.reject(&manager(), c.contact_id).await,
      Err(Error::InvalidTransition { .. })
    ));
  }

  #[tokio::test]
  async fn delete_by_owner_and_manager() {
    let lc = lifecycle();
    let a = lc.create(&user(), form("A")).await.unwrap();
    let b = lc.create(&user(), form("B")).await.unwrap();

    lc.delete(&user(), a.contact_id).await.unwrap();
    lc.delete(&manager(), b.contact_id).await.unwrap();
    assert!(lc.list(&admin()).await.unwrap().is_empty());
    assert!(matches!(
      lc.details(&user(), a.contact_id).await,
      Err(Error::NotFound(_))
    ));
  }

  #[test]
  fn resolve_edit_status_table() {
    let now = Utc::now();
    let contact = |status| Contact {
      contact_id: Uuid::new_v4(),
      owner_id: "ursula".into(),
      fields: ContactFields::default(),
      status,
      created_at: now,
      updated_at: now,
    };

    let approved = contact(ContactStatus::Approved);
    assert_eq!(
      resolve_edit_status(&user(), &approved, None).unwrap(),
      ContactStatus::Submitted
    );
    assert_eq!(
      resolve_edit_status(&user(), &approved, Some(ContactStatus::Approved))
        .unwrap(),
      ContactStatus::Submitted
    );
    assert_eq!(
      resolve_edit_status(&manager(), &approved, None).unwrap(),
      ContactStatus::Approved
    );
    assert_eq!(
      resolve_edit_status(&manager(), &approved, Some(ContactStatus::Submitted))
        .unwrap(),
      ContactStatus::Submitted
    );

    let submitted = contact(ContactStatus::Submitted);
    assert_eq!(
      resolve_edit_status(&user(), &submitted, Some(ContactStatus::Rejected))
        .unwrap(),
      ContactStatus::Submitted
    );
    assert_eq!(
      resolve_edit_status(&admin(), &submitted, Some(ContactStatus::Rejected))
        .unwrap(),
      ContactStatus::Rejected
    );
  }
}
