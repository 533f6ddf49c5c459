//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! It knows nothing about subjects or policy: authorization happens in
//! [`crate::lifecycle`] before any mutating call reaches a store.

use std::future::Future;

use uuid::Uuid;

use crate::{
  contact::{Contact, ContactUpdate, NewContact},
  policy::ListScope,
};

/// Abstraction over a contact store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new contact. The store assigns the id and both timestamps.
  fn add_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// List the contacts admitted by `scope`, ordered by name then id.
  fn list_contacts<'a>(
    &'a self,
    scope: &'a ListScope,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Overwrite the fields and status of an existing contact and bump its
  /// `updated_at`. Returns `None` if the contact no longer exists.
  fn update_contact(
    &self,
    update: ContactUpdate,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Delete a contact. Returns `false` if it did not exist.
  fn remove_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
